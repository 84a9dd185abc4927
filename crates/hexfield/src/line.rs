//! Cell-space line sampling.
//!
//! The line between two cells is sampled by linear interpolation of the raw
//! `(column, row)` coordinates with `steps = max(|dx|, |dy|)`. Each sample is
//! rounded to the nearest cell; consecutive duplicates and the two endpoints
//! are dropped. Samples keep their interpolation parameter `t` so callers can
//! blend per-sample values (e.g. sight heights) along the path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell::HexCell;

/// One intermediate cell on a sampled line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSample {
    /// The sampled cell.
    pub cell: HexCell,
    /// Position along the line in `(0, 1)`.
    pub t: f32,
}

/// Samples the intermediate cells between `origin` and `target`.
///
/// # Example
///
/// ```
/// use hexfield::{sample_line, HexCell};
///
/// let samples = sample_line(HexCell::new(0, 0), HexCell::new(0, 4));
/// let rows: Vec<i32> = samples.iter().map(|s| s.cell.row).collect();
/// assert_eq!(rows, vec![1, 2, 3]);
/// assert!((samples[0].t - 0.25).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn sample_line(origin: HexCell, target: HexCell) -> Vec<LineSample> {
    let dx = target.column - origin.column;
    let dy = target.row - origin.row;
    let steps = dx.unsigned_abs().max(dy.unsigned_abs());
    if steps <= 1 {
        return Vec::new();
    }

    let from = cell_to_vec(origin);
    let to = cell_to_vec(target);
    #[allow(clippy::cast_precision_loss)]
    let step_count = steps as f32;

    let mut samples: Vec<LineSample> = Vec::with_capacity(steps as usize);
    for i in 1..steps {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f32 / step_count;
        let cell = vec_to_cell(from.lerp(to, t));
        if cell == origin || cell == target {
            continue;
        }
        if samples.last().is_some_and(|last| last.cell == cell) {
            continue;
        }
        samples.push(LineSample { cell, t });
    }
    samples
}

/// The intermediate cells between `origin` and `target`, without parameters.
#[must_use]
pub fn intermediate_cells(origin: HexCell, target: HexCell) -> Vec<HexCell> {
    sample_line(origin, target)
        .into_iter()
        .map(|sample| sample.cell)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn cell_to_vec(cell: HexCell) -> Vec2 {
    Vec2::new(cell.column as f32, cell.row as f32)
}

#[allow(clippy::cast_possible_truncation)]
fn vec_to_cell(point: Vec2) -> HexCell {
    let rounded = point.round();
    HexCell::new(rounded.x as i32, rounded.y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_cell_has_no_samples() {
        assert!(sample_line(HexCell::new(2, 2), HexCell::new(2, 2)).is_empty());
    }

    #[test]
    fn adjacent_cells_have_no_samples() {
        assert!(sample_line(HexCell::new(2, 2), HexCell::new(3, 2)).is_empty());
        assert!(sample_line(HexCell::new(2, 2), HexCell::new(2, 3)).is_empty());
    }

    #[test]
    fn horizontal_line_visits_every_column() {
        let cells = intermediate_cells(HexCell::new(0, 3), HexCell::new(5, 3));
        assert_eq!(
            cells,
            vec![
                HexCell::new(1, 3),
                HexCell::new(2, 3),
                HexCell::new(3, 3),
                HexCell::new(4, 3),
            ]
        );
    }

    #[test]
    fn sample_count_is_bounded_by_steps() {
        let origin = HexCell::new(0, 0);
        let target = HexCell::new(7, 3);
        let samples = sample_line(origin, target);
        assert!(samples.len() <= 6);
        assert!(!samples.is_empty());
    }

    #[test]
    fn samples_exclude_endpoints_and_duplicates() {
        let origin = HexCell::new(-2, 5);
        let target = HexCell::new(4, -1);
        let samples = sample_line(origin, target);
        for window in samples.windows(2) {
            assert_ne!(window[0].cell, window[1].cell);
            assert!(window[0].t < window[1].t);
        }
        assert!(samples.iter().all(|s| s.cell != origin && s.cell != target));
    }

    #[test]
    fn parameters_lie_strictly_inside() {
        let samples = sample_line(HexCell::new(0, 0), HexCell::new(6, 2));
        assert!(samples.iter().all(|s| s.t > 0.0 && s.t < 1.0));
    }

    #[test]
    fn reversed_line_visits_same_cells_for_axis_aligned_paths() {
        let a = HexCell::new(1, 0);
        let b = HexCell::new(1, 6);
        let mut forward = intermediate_cells(a, b);
        let backward = intermediate_cells(b, a);
        forward.reverse();
        assert_eq!(forward, backward);
    }
}

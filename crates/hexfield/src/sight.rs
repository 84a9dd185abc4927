//! Sight-line occlusion over sampled lines.
//!
//! A sight line runs from an origin with a given effective vision (EV) to a
//! target with its own EV. Along the way the line height is the linear blend of
//! the two endpoint values. An intermediate cell blocks the line when:
//!
//! - it is impassable for whatever travels along the line, or
//! - its EV is positive, exceeds the line height at that sample, and the
//!   supreme-elevation exception does not apply.
//!
//! The supreme-elevation exception lets targets that stand well above an
//! obstacle be engaged over it: when `target_ev - cell_ev >= margin`, the cell
//! never blocks, whatever the line height.

use serde::{Deserialize, Serialize};

use crate::cell::HexCell;
use crate::line::sample_line;

/// Tunables for sight-line evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    /// How far the target must out-see an obstacle to ignore it.
    pub exception_margin: i32,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            exception_margin: 2,
        }
    }
}

/// What an intermediate cell presents to a passing sight line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occluder {
    /// Effective vision (occlusion height) of the cell.
    pub vision: i32,
    /// Whether the line may cross the cell at all.
    pub passable: bool,
}

impl Occluder {
    /// A passable cell with the given vision.
    #[must_use]
    pub const fn open(vision: i32) -> Self {
        Self {
            vision,
            passable: true,
        }
    }

    /// A cell the line may not cross.
    #[must_use]
    pub const fn wall() -> Self {
        Self {
            vision: 0,
            passable: false,
        }
    }
}

/// Why a sight line was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCause {
    /// The cell does not let the line pass at all.
    Impassable,
    /// The cell stands above the line height.
    Elevation,
}

/// Result of tracing a sight line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightLine {
    /// Every intermediate cell, in order from origin to target.
    pub cells: Vec<HexCell>,
    /// The first blocking cell and why, if any.
    pub blocked_at: Option<(HexCell, BlockCause)>,
}

impl SightLine {
    /// Returns `true` if nothing blocks the line.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.blocked_at.is_none()
    }
}

/// Returns `true` if the supreme-elevation exception shields a blocker.
///
/// ```
/// use hexfield::exception_applies;
///
/// assert!(exception_applies(5, 3, 2));
/// assert!(!exception_applies(4, 3, 2));
/// ```
#[must_use]
pub const fn exception_applies(target_vision: i32, blocker_vision: i32, margin: i32) -> bool {
    target_vision - blocker_vision >= margin
}

/// Traces the sight line from `origin` to `target`.
///
/// `occluder` is consulted once per intermediate cell. All intermediate cells
/// are reported even after the first block so that callers can display the
/// full path.
///
/// # Example
///
/// ```
/// use hexfield::{trace_sight, BlockCause, HexCell, Occluder, SightConfig};
///
/// let ridge = HexCell::new(0, 2);
/// let line = trace_sight(
///     HexCell::new(0, 0),
///     HexCell::new(0, 4),
///     0,
///     0,
///     SightConfig::default(),
///     |cell| if cell == ridge { Occluder::open(1) } else { Occluder::open(0) },
/// );
/// assert_eq!(line.blocked_at, Some((ridge, BlockCause::Elevation)));
/// ```
pub fn trace_sight<F>(
    origin: HexCell,
    target: HexCell,
    origin_vision: i32,
    target_vision: i32,
    config: SightConfig,
    mut occluder: F,
) -> SightLine
where
    F: FnMut(HexCell) -> Occluder,
{
    let samples = sample_line(origin, target);
    let mut blocked_at = None;

    #[allow(clippy::cast_precision_loss)]
    let (from, to) = (origin_vision as f32, target_vision as f32);

    for sample in &samples {
        if blocked_at.is_some() {
            break;
        }
        let cell = occluder(sample.cell);
        if !cell.passable {
            blocked_at = Some((sample.cell, BlockCause::Impassable));
            continue;
        }
        let line_height = from + (to - from) * sample.t;
        #[allow(clippy::cast_precision_loss)]
        let above_line = cell.vision as f32 > line_height;
        if cell.vision > 0
            && above_line
            && !exception_applies(target_vision, cell.vision, config.exception_margin)
        {
            blocked_at = Some((sample.cell, BlockCause::Elevation));
        }
    }

    SightLine {
        cells: samples.into_iter().map(|s| s.cell).collect(),
        blocked_at,
    }
}

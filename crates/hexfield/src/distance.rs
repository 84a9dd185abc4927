//! Bounded breadth-first distance fields.
//!
//! A [`DistanceField`] maps every cell reachable from an origin within a
//! radius to its step distance. Expansion happens ring by ring, so iteration
//! order is discovery order: the origin, then every distance-1 cell, and so on.
//! Within a ring, order follows the topology's neighbour order and carries no
//! further meaning.

use std::collections::{HashMap, VecDeque};

use crate::cell::HexCell;
use crate::topology::Topology;

/// Cell → distance mapping produced by a bounded BFS.
///
/// # Example
///
/// ```
/// use hexfield::{DistanceField, HexCell, RectBounds};
///
/// let bounds = RectBounds::new(10, 10);
/// let field = DistanceField::compute(HexCell::new(5, 5), 3, &bounds);
///
/// assert_eq!(field.distance(HexCell::new(5, 5)), Some(0));
/// assert_eq!(field.distance(HexCell::new(5, 8)), Some(3));
/// assert_eq!(field.distance(HexCell::new(5, 9)), None);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceField {
    origin: HexCell,
    radius: u32,
    /// Cells in discovery order.
    order: Vec<HexCell>,
    distances: HashMap<HexCell, u32>,
}

impl DistanceField {
    /// Runs the bounded BFS from `origin`.
    ///
    /// Returns an empty field when `origin` is not part of `topology`.
    #[must_use]
    pub fn compute<T: Topology + ?Sized>(origin: HexCell, radius: u32, topology: &T) -> Self {
        if !topology.contains(origin) {
            return Self::empty(origin);
        }

        let mut field = Self {
            origin,
            radius,
            order: vec![origin],
            distances: HashMap::from([(origin, 0)]),
        };

        let mut frontier = VecDeque::from([(origin, 0u32)]);
        while let Some((cell, distance)) = frontier.pop_front() {
            let next = distance + 1;
            if next > radius {
                continue;
            }
            for neighbor in topology.neighbors(cell).into_iter().flatten() {
                if field.distances.contains_key(&neighbor) {
                    continue;
                }
                field.distances.insert(neighbor, next);
                field.order.push(neighbor);
                frontier.push_back((neighbor, next));
            }
        }

        tracing::trace!(
            origin = %origin,
            radius,
            cells = field.order.len(),
            "distance field computed"
        );
        field
    }

    /// A field with no reachable cells.
    #[must_use]
    pub fn empty(origin: HexCell) -> Self {
        Self {
            origin,
            radius: 0,
            order: Vec::new(),
            distances: HashMap::new(),
        }
    }

    /// The cell the search started from.
    #[must_use]
    pub const fn origin(&self) -> HexCell {
        self.origin
    }

    /// The radius the search was bounded by.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Distance to `cell`, or `None` if it was not reached.
    #[must_use]
    pub fn distance(&self, cell: HexCell) -> Option<u32> {
        self.distances.get(&cell).copied()
    }

    /// Returns `true` if `cell` was reached.
    #[must_use]
    pub fn contains(&self, cell: HexCell) -> bool {
        self.distances.contains_key(&cell)
    }

    /// Number of reached cells, origin included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing was reached (invalid origin).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(cell, distance)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (HexCell, u32)> + '_ {
        self.order.iter().map(|cell| (*cell, self.distances[cell]))
    }

    /// Cells at exactly `distance` steps, in discovery order.
    pub fn ring(&self, distance: u32) -> impl Iterator<Item = HexCell> + '_ {
        self.iter()
            .filter(move |(_, d)| *d == distance)
            .map(|(cell, _)| cell)
    }
}

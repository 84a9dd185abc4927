//! Board topology: which cells exist and how they connect.

use serde::{Deserialize, Serialize};

use crate::cell::HexCell;

/// Decides which cells are part of the board.
///
/// The neighbour function is derived from [`HexCell::neighbors`] filtered by
/// [`Topology::contains`], so implementors normally only describe their
/// bounds. A cell without a tile is still part of the topology unless the
/// implementor excludes it.
pub trait Topology {
    /// Returns `true` if `cell` is on the board.
    fn contains(&self, cell: HexCell) -> bool;

    /// The up to six neighbours of `cell` that are on the board.
    ///
    /// Slots for off-board neighbours are `None`; the order matches
    /// [`HexCell::neighbors`].
    fn neighbors(&self, cell: HexCell) -> [Option<HexCell>; 6] {
        cell.neighbors().map(|n| self.contains(n).then_some(n))
    }
}

/// An infinite grid where every cell exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unbounded;

impl Topology for Unbounded {
    fn contains(&self, _cell: HexCell) -> bool {
        true
    }
}

/// A rectangular board of `columns × rows` cells starting at `(0, 0)`.
///
/// # Example
///
/// ```
/// use hexfield::{HexCell, RectBounds, Topology};
///
/// let bounds = RectBounds::new(4, 3);
/// assert!(bounds.contains(HexCell::new(3, 2)));
/// assert!(!bounds.contains(HexCell::new(4, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectBounds {
    /// Number of columns.
    pub columns: i32,
    /// Number of rows.
    pub rows: i32,
}

impl RectBounds {
    /// Creates bounds with the given dimensions.
    #[must_use]
    pub const fn new(columns: i32, rows: i32) -> Self {
        Self { columns, rows }
    }

    /// Total number of cells inside the bounds.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::try_from(self.columns.max(0)).unwrap_or(0)
            * usize::try_from(self.rows.max(0)).unwrap_or(0)
    }
}

impl Topology for RectBounds {
    fn contains(&self, cell: HexCell) -> bool {
        (0..self.columns).contains(&cell.column) && (0..self.rows).contains(&cell.row)
    }
}

impl<T: Topology + ?Sized> Topology for &T {
    fn contains(&self, cell: HexCell) -> bool {
        (**self).contains(cell)
    }
}

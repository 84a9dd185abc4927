//! Hex cell coordinates.
//!
//! Cells use an odd-q offset layout: columns are vertical strips and every odd
//! column is shifted half a cell down. Geometry (adjacency, distance) goes
//! through cube coordinates so that it stays exact for negative columns too.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cube-coordinate steps to the six neighbours, in ring order starting north.
const CUBE_DIRECTIONS: [(i32, i32, i32); 6] = [
    (0, 1, -1),
    (1, 0, -1),
    (1, -1, 0),
    (0, -1, 1),
    (-1, 0, 1),
    (-1, 1, 0),
];

/// A cell on the hex board, addressed by offset coordinates.
///
/// # Example
///
/// ```
/// use hexfield::HexCell;
///
/// let a = HexCell::new(0, 0);
/// let b = HexCell::new(3, 1);
///
/// assert_eq!(a.distance_to(b), 3);
/// assert!(a.neighbors().contains(&HexCell::new(1, 0)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct HexCell {
    /// Column index (x in cell space).
    pub column: i32,
    /// Row index (y in cell space).
    pub row: i32,
}

impl HexCell {
    /// The cell at column 0, row 0.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a cell from its column and row.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Converts to cube coordinates `(x, y, z)` with `x + y + z == 0`.
    #[must_use]
    pub const fn to_cube(self) -> (i32, i32, i32) {
        let x = self.column;
        let z = self.row - (self.column - (self.column & 1)) / 2;
        let y = -x - z;
        (x, y, z)
    }

    /// Converts back from cube coordinates. The `y` component is implied.
    #[must_use]
    pub const fn from_cube(x: i32, z: i32) -> Self {
        Self {
            column: x,
            row: z + (x - (x & 1)) / 2,
        }
    }

    /// Number of steps between two cells on an unobstructed grid.
    #[must_use]
    pub fn distance_to(self, other: Self) -> u32 {
        let (x1, y1, z1) = self.to_cube();
        let (x2, y2, z2) = other.to_cube();
        let sum = (x1 - x2).unsigned_abs() + (y1 - y2).unsigned_abs() + (z1 - z2).unsigned_abs();
        sum / 2
    }

    /// The six adjacent cells in ring order.
    ///
    /// Board bounds are not considered here; see
    /// [`Topology::neighbors`](crate::Topology::neighbors).
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        let (x, _, z) = self.to_cube();
        CUBE_DIRECTIONS.map(|(dx, _, dz)| Self::from_cube(x + dx, z + dz))
    }

    /// Returns `true` if `other` shares an edge with this cell.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance_to(other) == 1
    }
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

impl From<(i32, i32)> for HexCell {
    fn from((column, row): (i32, i32)) -> Self {
        Self::new(column, row)
    }
}

//! # Hexfield
//!
//! Hex-grid spatial substrate for turn-based tactical rules.
//!
//! Hexfield knows nothing about units, weapons or terrain catalogs. It provides
//! the geometric primitives the rules layer is built from:
//!
//! - **Cells**: [`HexCell`] in odd-q offset layout with cube-coordinate
//!   distance and a fixed six-neighbour adjacency
//! - **Topology**: [`Topology`] decides which cells exist (board bounds)
//! - **Distance fields**: [`DistanceField`] is a bounded breadth-first search
//!   from an origin, expanding ring by ring
//! - **Line sampling**: [`sample_line`] interpolates the intermediate cells
//!   between two cells
//! - **Sight lines**: [`trace_sight`] walks a sampled line and decides whether
//!   an occluder blocks it, including the supreme-elevation exception
//!
//! ## Quick Start
//!
//! ```
//! use hexfield::{DistanceField, HexCell, Unbounded};
//!
//! let field = DistanceField::compute(HexCell::new(0, 0), 2, &Unbounded);
//! assert_eq!(field.len(), 19);
//! assert_eq!(field.distance(HexCell::new(0, 0)), Some(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cell;
pub mod distance;
pub mod line;
pub mod sight;
pub mod topology;

#[cfg(test)]
mod proptests;

// Re-exports for convenience
pub use cell::HexCell;
pub use distance::DistanceField;
pub use line::{intermediate_cells, sample_line, LineSample};
pub use sight::{exception_applies, trace_sight, BlockCause, Occluder, SightConfig, SightLine};
pub use topology::{RectBounds, Topology, Unbounded};

//! Error types for structurally invalid requests.
//!
//! Rules outcomes (a rejected target, a slot that is full, a counter that
//! cannot fire) are ordinary values carried in sensor reports. [`RulesError`]
//! is reserved for requests that cannot be carried out at all: unknown ids,
//! indices out of range, broken catalogs.

use hexfield::HexCell;
use thiserror::Error;

use crate::catalog::CatalogKind;
use crate::unit::UnitId;

/// Errors raised by board mutation, catalog construction and loading.
#[derive(Error, Debug)]
pub enum RulesError {
    /// No unit with this id is on the board.
    #[error("unit not found: {0:?}")]
    UnitNotFound(UnitId),

    /// A catalog lookup failed.
    #[error("{kind} not found in catalog: {id}")]
    CatalogEntryNotFound {
        /// Which catalog was searched.
        kind: CatalogKind,
        /// The missing id.
        id: String,
    },

    /// Two catalog records share an id.
    #[error("duplicate {kind} id in catalog: {id}")]
    DuplicateCatalogEntry {
        /// Which catalog holds the duplicate.
        kind: CatalogKind,
        /// The duplicated id.
        id: String,
    },

    /// The unit has no weapon at this index.
    #[error("unit {unit:?} has no weapon at index {index}")]
    WeaponIndexOutOfRange {
        /// The unit.
        unit: UnitId,
        /// The requested embark index.
        index: usize,
    },

    /// Not enough ammunition left to fire.
    #[error("weapon {index} of unit {unit:?} has {available} rounds, {requested} requested")]
    InsufficientAmmunition {
        /// The unit.
        unit: UnitId,
        /// The weapon's embark index.
        index: usize,
        /// Rounds left.
        available: u32,
        /// Rounds requested.
        requested: u32,
    },

    /// The chosen trajectory is not supported by the weapon profile.
    #[error("weapon {weapon} does not support trajectory {trajectory}")]
    UnsupportedTrajectory {
        /// The weapon id.
        weapon: String,
        /// The requested trajectory.
        trajectory: String,
    },

    /// The cell is outside the board.
    #[error("cell {0} is outside the board")]
    CellOutOfBounds(HexCell),

    /// Another unit already stands on the cell.
    #[error("cell {cell} is occupied by {occupant:?}")]
    CellOccupied {
        /// The contested cell.
        cell: HexCell,
        /// The unit already there.
        occupant: UnitId,
    },

    /// An embark request no longer fits the slot.
    #[error("slot {slot} of transporter {transporter:?} is full ({capacity} places)")]
    SlotFull {
        /// The transporter.
        transporter: UnitId,
        /// The slot index.
        slot: usize,
        /// Slot capacity.
        capacity: u32,
    },

    /// An embark request is stale or invalid for the current board.
    #[error("invalid embarkation: {0}")]
    InvalidEmbarkation(String),

    /// The unit is not embarked in any transporter.
    #[error("unit {0:?} is not embarked")]
    NotEmbarked(UnitId),

    /// The unit rides in a transporter and cannot act on its own.
    #[error("unit {0:?} is embarked")]
    UnitEmbarked(UnitId),

    /// Catalog or config JSON could not be parsed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result alias for rules operations.
pub type Result<T> = std::result::Result<T, RulesError>;

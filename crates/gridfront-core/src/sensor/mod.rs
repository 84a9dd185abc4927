//! Sensors: read-only scans that enumerate what a unit may do.
//!
//! Sensors read a [`BoardView`](crate::view::BoardView) and produce fresh
//! reports every time they run. They never mutate the board, so re-running
//! one against an unchanged board yields the same report.
//!
//! - [`TargetingSensor`]: valid (target, weapon) pairs, counter-attack
//!   eligibility and preferred-target ranking
//! - [`EmbarkationSensor`]: adjacent transporters and slots a unit may board
//! - [`LineOfFireResolver`]: whether terrain or elevation blocks a shot
//!
//! Every candidate a sensor discards is reported with a [`RejectReason`].

pub mod embarkation;
pub mod line_of_fire;
pub mod targeting;

use hexfield::{BlockCause, HexCell};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::SkillId;
use crate::unit::Unit;
use crate::view::BoardView;

pub use embarkation::{EmbarkOption, EmbarkRejection, EmbarkReport, EmbarkationSensor};
pub use line_of_fire::LineOfFireResolver;
pub use targeting::{
    CounterAssessment, MovementMode, TargetOption, TargetRejection, TargetReport, TargetingSensor,
};

/// Why a sensor discarded a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Target distance lies outside the weapon's range bracket.
    OutOfRange {
        /// Hex distance to the target.
        distance: u32,
        /// Effective minimum range.
        min: u32,
        /// Effective maximum range.
        max: u32,
    },
    /// The weapon has no rounds left.
    NoAmmunition,
    /// The weapon or slot cannot handle the other unit's layer.
    LayerIncompatible,
    /// Something on the path blocks the shot.
    LineOfFireBlocked {
        /// The blocking cell.
        cell: HexCell,
        /// What blocks it.
        cause: BlockCause,
    },
    /// The target has not been detected.
    NotDetected,
    /// The units are not adjacent.
    DistanceNotOne,
    /// Not enough movement left to pay the entry cost.
    InsufficientMovement {
        /// Entry cost.
        required: u32,
        /// Movement left.
        available: u32,
    },
    /// The slot is at capacity.
    SlotFull {
        /// Slot capacity.
        capacity: u32,
    },
    /// The slot does not accept this unit class.
    ClassNotAllowed,
    /// A required skill is missing.
    MissingRequiredSkill(SkillId),
    /// A held skill bars boarding.
    BlockedSkill(SkillId),
    /// The transporter's cell does not allow boarding for this layer.
    IncompatibleContext,
    /// The transporter belongs to another team.
    NotAllied,
    /// The transporter is in flight.
    TransporterAirborne,
    /// The unit has no transport slots.
    NoTransportCapability,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { distance, min, max } => {
                write!(f, "target at distance {distance} is outside range {min}-{max}")
            }
            Self::NoAmmunition => write!(f, "no ammunition left"),
            Self::LayerIncompatible => write!(f, "incompatible domain or height"),
            Self::LineOfFireBlocked { cell, cause } => match cause {
                BlockCause::Impassable => write!(f, "line of fire blocked by terrain at {cell}"),
                BlockCause::Elevation => write!(f, "line of fire blocked by elevation at {cell}"),
            },
            Self::NotDetected => write!(f, "target not detected"),
            Self::DistanceNotOne => write!(f, "units are not adjacent"),
            Self::InsufficientMovement {
                required,
                available,
            } => write!(f, "needs {required} movement, {available} left"),
            Self::SlotFull { capacity } => write!(f, "slot is full ({capacity} places)"),
            Self::ClassNotAllowed => write!(f, "unit class not allowed in slot"),
            Self::MissingRequiredSkill(skill) => write!(f, "requires skill {skill}"),
            Self::BlockedSkill(skill) => write!(f, "skill {skill} is not allowed"),
            Self::IncompatibleContext => write!(f, "boarding not possible at this location"),
            Self::NotAllied => write!(f, "transporter is not allied"),
            Self::TransporterAirborne => write!(f, "transporter is airborne"),
            Self::NoTransportCapability => write!(f, "unit cannot carry passengers"),
        }
    }
}

/// Why a defender cannot counter-attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoCounterReason {
    /// The attacker is not adjacent.
    DistanceNotOne,
    /// No weapon with minimum range 1.
    NoShortRangeWeapon,
    /// Short-range weapons are out of ammunition.
    NoAmmunition,
    /// No loaded short-range weapon can engage the attacker's layer.
    LayerIncompatible,
    /// The counter weapon was gone when combat resolved.
    WeaponUnavailable,
}

impl fmt::Display for NoCounterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistanceNotOne => write!(f, "attacker is not adjacent"),
            Self::NoShortRangeWeapon => write!(f, "no short-range weapon"),
            Self::NoAmmunition => write!(f, "short-range weapons are empty"),
            Self::LayerIncompatible => write!(f, "cannot engage the attacker's layer"),
            Self::WeaponUnavailable => write!(f, "counter weapon unavailable"),
        }
    }
}

/// Decides whether an observer has detected a target.
pub trait DetectionModel {
    /// Returns `true` if `observer` may engage `target`.
    fn detects(&self, view: &BoardView<'_>, observer: &Unit, target: &Unit) -> bool;
}

/// Detects everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDetect;

impl DetectionModel for AlwaysDetect {
    fn detects(&self, _view: &BoardView<'_>, _observer: &Unit, _target: &Unit) -> bool {
        true
    }
}

//! Units on the board.
//!
//! This module provides the unit types the rules operate on:
//! - [`UnitId`]: Unique identifier assigned by the [`Board`](crate::board::Board)
//! - [`Team`]: Side a unit fights for
//! - [`UnitClass`]: Class used by matchup tables, slot filters and skills
//! - [`UnitFlags`]: Status flags (eliminated, held in reserve)
//! - [`UnitSpec`]: Builder describing a unit before it is spawned
//! - [`Unit`]: A spawned unit
//!
//! Units are only mutated through the board's entry points; callers receive
//! shared references.
//!
//! # Example
//!
//! ```
//! use gridfront_core::board::Board;
//! use gridfront_core::layer::Layer;
//! use gridfront_core::unit::{CombatState, Team, UnitClass, UnitSpec};
//! use hexfield::HexCell;
//!
//! let mut board = Board::new(8, 8);
//! let id = board
//!     .spawn(
//!         UnitSpec::new(Team::new(1), UnitClass::Infantry, Layer::Land, HexCell::new(2, 3))
//!             .with_combat(CombatState::new(10, 2)),
//!     )
//!     .unwrap();
//!
//! let unit = board.unit(id).unwrap();
//! assert_eq!(unit.combat.hp, 10);
//! assert!(unit.is_active());
//! ```

pub mod components;

use bitflags::bitflags;
use hexfield::HexCell;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::SkillId;
use crate::layer::Layer;

pub use components::{CombatState, EmbarkedWeapon, Embarkment, TransportBay, TransportSlot};

/// Unique identifier for a unit.
///
/// Ids are assigned monotonically by the board and order units
/// deterministically.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u64);

impl UnitId {
    /// Creates a `UnitId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UnitId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// The side a unit fights for. Units of the same team are allies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team(u8);

impl Team {
    /// Creates a team from its number.
    #[must_use]
    pub const fn new(team: u8) -> Self {
        Self(team)
    }

    /// The team number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Unit class, the key of matchup (RPS) tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Foot soldiers.
    Infantry,
    /// Infantry in armoured carriers.
    Mechanized,
    /// Tanks.
    Armor,
    /// Guns and howitzers.
    Artillery,
    /// Anti-aircraft guns and launchers.
    AntiAir,
    /// Scouts.
    Recon,
    /// Combat engineers.
    Engineer,
    /// Rotary-wing aircraft.
    Helicopter,
    /// Air-superiority aircraft.
    Fighter,
    /// Ground-attack aircraft.
    Bomber,
    /// Surface combatants.
    Warship,
    /// Submarines.
    Submarine,
    /// Dedicated carriers (landing craft, trucks).
    Transport,
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Infantry => "Infantry",
            Self::Mechanized => "Mechanized",
            Self::Armor => "Armor",
            Self::Artillery => "Artillery",
            Self::AntiAir => "Anti-air",
            Self::Recon => "Recon",
            Self::Engineer => "Engineer",
            Self::Helicopter => "Helicopter",
            Self::Fighter => "Fighter",
            Self::Bomber => "Bomber",
            Self::Warship => "Warship",
            Self::Submarine => "Submarine",
            Self::Transport => "Transport",
        };
        write!(f, "{name}")
    }
}

bitflags! {
    /// Unit status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct UnitFlags: u8 {
        /// HP reached zero.
        const ELIMINATED = 1 << 0;
        /// Not deployed; ignored by sensors.
        const RESERVE = 1 << 1;
    }
}

/// Description of a unit before it is placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Display name.
    pub name: String,
    /// Owning team.
    pub team: Team,
    /// Unit class.
    pub class: UnitClass,
    /// Current layer.
    pub layer: Layer,
    /// Starting cell.
    pub cell: HexCell,
    /// Combat numbers.
    pub combat: CombatState,
    /// Mounted weapons in embark order.
    pub weapons: Vec<EmbarkedWeapon>,
    /// Held skills.
    pub skills: Vec<SkillId>,
    /// Boarding slots, for transporters.
    pub transport: Option<TransportBay>,
    /// Initial status flags.
    pub flags: UnitFlags,
}

impl UnitSpec {
    /// A unit with default combat numbers and no weapons.
    #[must_use]
    pub fn new(team: Team, class: UnitClass, layer: Layer, cell: HexCell) -> Self {
        Self {
            name: class.to_string(),
            team,
            class,
            layer,
            cell,
            combat: CombatState::default(),
            weapons: Vec::new(),
            skills: Vec::new(),
            transport: None,
            flags: UnitFlags::empty(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the combat numbers.
    #[must_use]
    pub fn with_combat(mut self, combat: CombatState) -> Self {
        self.combat = combat;
        self
    }

    /// Mounts a weapon after the existing ones.
    #[must_use]
    pub fn with_weapon(mut self, weapon: EmbarkedWeapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    /// Grants a skill.
    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skills.push(skill);
        self
    }

    /// Makes the unit a transporter.
    #[must_use]
    pub fn with_transport(mut self, bay: TransportBay) -> Self {
        self.transport = Some(bay);
        self
    }

    /// Holds the unit in reserve.
    #[must_use]
    pub fn in_reserve(mut self) -> Self {
        self.flags.insert(UnitFlags::RESERVE);
        self
    }
}

/// A unit on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    /// Display name.
    pub name: String,
    /// Owning team.
    pub team: Team,
    /// Unit class.
    pub class: UnitClass,
    /// Current layer.
    pub layer: Layer,
    /// Own cell. Embarked units report their transporter's cell through
    /// [`Board::effective_cell`](crate::board::Board::effective_cell).
    pub cell: HexCell,
    /// Combat numbers.
    pub combat: CombatState,
    /// Mounted weapons in embark order.
    pub weapons: Vec<EmbarkedWeapon>,
    /// Held skills.
    pub skills: Vec<SkillId>,
    /// Boarding slots, for transporters.
    pub transport: Option<TransportBay>,
    /// Set while the unit rides in a transporter.
    pub embarked: Option<Embarkment>,
    /// Status flags.
    pub flags: UnitFlags,
}

impl Unit {
    pub(crate) fn from_spec(id: UnitId, spec: UnitSpec) -> Self {
        let mut combat = spec.combat;
        combat.hp = combat.hp.min(combat.max_hp);
        let mut flags = spec.flags;
        if combat.is_eliminated() {
            flags.insert(UnitFlags::ELIMINATED);
        }
        Self {
            id,
            name: spec.name,
            team: spec.team,
            class: spec.class,
            layer: spec.layer,
            cell: spec.cell,
            combat,
            weapons: spec.weapons,
            skills: spec.skills,
            transport: spec.transport,
            embarked: None,
            flags,
        }
    }

    /// The unit's id.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Returns `true` if the unit is deployed and not eliminated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self
            .flags
            .intersects(UnitFlags::ELIMINATED | UnitFlags::RESERVE)
    }

    /// Returns `true` while the unit rides in a transporter.
    #[must_use]
    pub const fn is_embarked(&self) -> bool {
        self.embarked.is_some()
    }

    /// Returns `true` if the unit has at least one boarding slot.
    #[must_use]
    pub fn is_transporter(&self) -> bool {
        self.transport
            .as_ref()
            .is_some_and(|bay| !bay.slots.is_empty())
    }

    /// Returns `true` if both units fight for the same team.
    #[must_use]
    pub fn is_allied_with(&self, other: &Self) -> bool {
        self.team == other.team
    }

    /// Returns `true` if the unit holds `skill`.
    #[must_use]
    pub fn has_skill(&self, skill: &SkillId) -> bool {
        self.skills.contains(skill)
    }

    /// The weapon at `index`, if any.
    #[must_use]
    pub fn weapon(&self, index: usize) -> Option<&EmbarkedWeapon> {
        self.weapons.get(index)
    }
}

//! Per-unit state components.
//!
//! These structs hold the mutable and semi-static state of a unit instance:
//! its combat numbers, its embarked weapons and, for transporters, the slots
//! other units can board.

use serde::{Deserialize, Serialize};

use crate::catalog::{SkillId, Trajectory, WeaponId, WeaponProfile};
use crate::error::{Result, RulesError};
use crate::layer::LayerMask;
use crate::unit::{UnitClass, UnitId};

/// Hit points, defense and experience of a unit.
///
/// HP is the unit's strength: combat multiplies weapon power by current HP
/// and eliminations are subtracted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current hit points, `0..=max_hp`.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Defense before positional, matchup and skill bonuses.
    pub base_defense: i32,
    /// Experience tier, used by skill conditions.
    pub elite_level: u8,
}

impl CombatState {
    /// Full-strength state with the given HP and base defense.
    #[must_use]
    pub const fn new(max_hp: u32, base_defense: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            base_defense,
            elite_level: 0,
        }
    }

    /// Sets the elite level.
    #[must_use]
    pub const fn with_elite_level(mut self, elite_level: u8) -> Self {
        self.elite_level = elite_level;
        self
    }

    /// Returns `true` once HP has reached zero.
    #[must_use]
    pub const fn is_eliminated(&self) -> bool {
        self.hp == 0
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(10, 1)
    }
}

/// A weapon mounted on a unit instance.
///
/// Ranges start from the profile's values but belong to the instance, so a
/// unit can carry a shortened or extended variant of a catalog weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbarkedWeapon {
    /// Catalog id of the weapon profile.
    pub weapon: WeaponId,
    /// Rounds left, `0..=max_ammo`.
    pub ammo: u32,
    /// Magazine size.
    pub max_ammo: u32,
    /// Effective minimum range.
    pub min_range: u32,
    /// Effective maximum range.
    pub max_range: u32,
    /// Trajectory this instance fires with.
    pub trajectory: Trajectory,
}

impl EmbarkedWeapon {
    /// Mounts `profile` with a full magazine and the given trajectory.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnsupportedTrajectory`] if the profile does not
    /// support `trajectory`.
    pub fn new(profile: &WeaponProfile, trajectory: Trajectory) -> Result<Self> {
        if !profile.trajectories.supports(trajectory) {
            return Err(RulesError::UnsupportedTrajectory {
                weapon: profile.id.to_string(),
                trajectory: trajectory.to_string(),
            });
        }
        Ok(Self {
            weapon: profile.id.clone(),
            ammo: profile.ammo_capacity,
            max_ammo: profile.ammo_capacity,
            min_range: profile.min_range,
            max_range: profile.max_range,
            trajectory,
        })
    }

    /// Mounts `profile` with its preferred trajectory (straight when supported).
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnsupportedTrajectory`] if the profile supports
    /// no trajectory at all.
    pub fn from_profile(profile: &WeaponProfile) -> Result<Self> {
        let trajectory = profile.trajectories.preferred().ok_or_else(|| {
            RulesError::UnsupportedTrajectory {
                weapon: profile.id.to_string(),
                trajectory: "none".to_string(),
            }
        })?;
        Self::new(profile, trajectory)
    }

    /// Overrides the instance range bracket.
    #[must_use]
    pub const fn with_range(mut self, min_range: u32, max_range: u32) -> Self {
        self.min_range = min_range;
        self.max_range = max_range;
        self
    }

    /// Sets the rounds left, clamped to the magazine size.
    #[must_use]
    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo.min(self.max_ammo);
        self
    }

    /// Returns `true` if at least one round is left.
    #[must_use]
    pub const fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Returns `true` if `distance` lies inside the range bracket.
    #[must_use]
    pub const fn in_range(&self, distance: u32) -> bool {
        distance >= self.min_range && distance <= self.max_range
    }
}

/// One boarding slot of a transporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSlot {
    /// Number of units the slot holds.
    pub capacity: u32,
    /// Passenger layers the slot accepts.
    pub layers: LayerMask,
    /// If set, only these classes may board (and only they count toward occupancy).
    #[serde(default)]
    pub classes: Option<Vec<UnitClass>>,
    /// Skills a passenger must hold.
    #[serde(default)]
    pub required_skills: Vec<SkillId>,
    /// Skills that bar a passenger from boarding.
    #[serde(default)]
    pub blocked_skills: Vec<SkillId>,
}

impl TransportSlot {
    /// A slot with no class or skill restrictions.
    #[must_use]
    pub const fn new(capacity: u32, layers: LayerMask) -> Self {
        Self {
            capacity,
            layers,
            classes: None,
            required_skills: Vec::new(),
            blocked_skills: Vec::new(),
        }
    }

    /// Restricts the slot to the given classes.
    #[must_use]
    pub fn for_classes(mut self, classes: impl IntoIterator<Item = UnitClass>) -> Self {
        self.classes = Some(classes.into_iter().collect());
        self
    }

    /// Adds a required skill.
    #[must_use]
    pub fn requiring(mut self, skill: SkillId) -> Self {
        self.required_skills.push(skill);
        self
    }

    /// Adds a blocked skill.
    #[must_use]
    pub fn blocking(mut self, skill: SkillId) -> Self {
        self.blocked_skills.push(skill);
        self
    }

    /// Returns `true` if `class` passes the slot's class filter.
    #[must_use]
    pub fn admits_class(&self, class: UnitClass) -> bool {
        self.classes
            .as_ref()
            .map_or(true, |classes| classes.contains(&class))
    }
}

/// The boarding slots of a transporter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportBay {
    /// Slots in declaration order; embark options refer to them by index.
    pub slots: Vec<TransportSlot>,
}

impl TransportBay {
    /// A bay with the given slots.
    #[must_use]
    pub fn new(slots: impl IntoIterator<Item = TransportSlot>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }
}

/// Link from a passenger to the transporter carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embarkment {
    /// The carrying unit.
    pub transporter: UnitId,
    /// The slot index the passenger boarded.
    pub slot: usize,
}

//! Class-versus-class ("rock-paper-scissors") bonus rules and the weapon
//! priority table.

use serde::{Deserialize, Serialize};

use super::WeaponCategory;
use crate::unit::UnitClass;

/// Attack bonus for an attacker class firing a weapon category at a
/// defender class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRule {
    /// Class of the firing unit.
    pub attacker: UnitClass,
    /// Category of the weapon fired.
    pub weapon: WeaponCategory,
    /// Class of the unit fired upon.
    pub defender: UnitClass,
    /// Added to weapon power.
    pub bonus: i32,
    /// Optional explanation shown to players.
    #[serde(default)]
    pub description: Option<String>,
}

impl AttackRule {
    /// Creates a rule without description.
    #[must_use]
    pub const fn new(
        attacker: UnitClass,
        weapon: WeaponCategory,
        defender: UnitClass,
        bonus: i32,
    ) -> Self {
        Self {
            attacker,
            weapon,
            defender,
            bonus,
            description: None,
        }
    }

    /// Lookup key: (attacker class, weapon category, defender class).
    #[must_use]
    pub const fn key(&self) -> (UnitClass, WeaponCategory, UnitClass) {
        (self.attacker, self.weapon, self.defender)
    }
}

/// Defense bonus for a defender class against an attacker class firing a
/// weapon category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseRule {
    /// Class of the unit fired upon.
    pub defender: UnitClass,
    /// Class of the firing unit.
    pub attacker: UnitClass,
    /// Category of the weapon fired.
    pub weapon: WeaponCategory,
    /// Added to effective defense.
    pub bonus: i32,
    /// Optional explanation shown to players.
    #[serde(default)]
    pub description: Option<String>,
}

impl DefenseRule {
    /// Creates a rule without description.
    #[must_use]
    pub const fn new(
        defender: UnitClass,
        attacker: UnitClass,
        weapon: WeaponCategory,
        bonus: i32,
    ) -> Self {
        Self {
            defender,
            attacker,
            weapon,
            bonus,
            description: None,
        }
    }

    /// Lookup key: (defender class, attacker class, weapon category).
    #[must_use]
    pub const fn key(&self) -> (UnitClass, UnitClass, WeaponCategory) {
        (self.defender, self.attacker, self.weapon)
    }
}

/// Marks a target class as a preferred target for a weapon category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponPriority {
    /// Weapon category.
    pub weapon: WeaponCategory,
    /// Preferred target class.
    pub target: UnitClass,
}

//! Skills and their combat modifiers.
//!
//! A skill carries any number of [`SkillModifier`]s. Each modifier adjusts
//! either attack or defense, applies either to the unit holding the skill
//! ([`ModifierScope::Own`]) or to the unit it fights
//! ([`ModifierScope::Opponent`]), and only fires when its
//! [`SkillCondition`] matches the engagement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{SkillId, TerrainId, WeaponCategory};
use crate::unit::UnitClass;

/// The combat value a modifier adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierStat {
    /// Added to weapon power.
    Attack,
    /// Added to effective defense.
    Defense,
}

/// Whose value a modifier adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierScope {
    /// The unit holding the skill.
    Own,
    /// The unit the holder is fighting.
    Opponent,
}

/// When a modifier applies. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCondition {
    /// Classes the holder must belong to.
    pub holder_classes: Option<Vec<UnitClass>>,
    /// Classes the opponent must belong to.
    pub opponent_classes: Option<Vec<UnitClass>>,
    /// Minimum elite level of the holder.
    pub min_elite_level: u8,
    /// Categories the weapon in play must belong to.
    pub weapon_categories: Option<Vec<WeaponCategory>>,
}

/// The engagement a condition is evaluated against, seen from the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillContext {
    /// Class of the skill holder.
    pub holder_class: UnitClass,
    /// Elite level of the skill holder.
    pub holder_elite_level: u8,
    /// Class of the other unit.
    pub opponent_class: UnitClass,
    /// Category of the weapon being fired in this exchange, if any.
    pub weapon_category: Option<WeaponCategory>,
}

impl SkillCondition {
    /// Returns `true` if the condition holds in `context`.
    #[must_use]
    pub fn matches(&self, context: &SkillContext) -> bool {
        let holder_ok = self
            .holder_classes
            .as_ref()
            .map_or(true, |classes| classes.contains(&context.holder_class));
        let opponent_ok = self
            .opponent_classes
            .as_ref()
            .map_or(true, |classes| classes.contains(&context.opponent_class));
        let weapon_ok = match (&self.weapon_categories, context.weapon_category) {
            (None, _) => true,
            (Some(categories), Some(category)) => categories.contains(&category),
            (Some(_), None) => false,
        };
        holder_ok
            && opponent_ok
            && weapon_ok
            && context.holder_elite_level >= self.min_elite_level
    }
}

/// A single conditional adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillModifier {
    /// Adjusted value.
    pub stat: ModifierStat,
    /// Adjusted unit.
    pub scope: ModifierScope,
    /// Signed amount.
    pub amount: i32,
    /// When it applies.
    #[serde(default)]
    pub condition: SkillCondition,
}

impl SkillModifier {
    /// An unconditional modifier.
    #[must_use]
    pub fn new(stat: ModifierStat, scope: ModifierScope, amount: i32) -> Self {
        Self {
            stat,
            scope,
            amount,
            condition: SkillCondition::default(),
        }
    }

    /// Attaches a condition.
    #[must_use]
    pub fn when(mut self, condition: SkillCondition) -> Self {
        self.condition = condition;
        self
    }
}

/// Static description of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProfile {
    /// Catalog id.
    pub id: SkillId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Combat modifiers.
    #[serde(default)]
    pub modifiers: Vec<SkillModifier>,
    /// Boarding fallback costs replacing a terrain's autonomy cost.
    #[serde(default)]
    pub terrain_cost_overrides: BTreeMap<TerrainId, u32>,
}

impl SkillProfile {
    /// A skill with no effects.
    #[must_use]
    pub fn new(id: impl Into<SkillId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            modifiers: Vec::new(),
            terrain_cost_overrides: BTreeMap::new(),
        }
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: SkillModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Adds a boarding cost override.
    #[must_use]
    pub fn with_cost_override(mut self, terrain: impl Into<TerrainId>, cost: u32) -> Self {
        self.terrain_cost_overrides.insert(terrain.into(), cost);
        self
    }

    /// Sum of the modifiers for `stat` and `scope` that match `context`.
    #[must_use]
    pub fn bonus(&self, stat: ModifierStat, scope: ModifierScope, context: &SkillContext) -> i32 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat && m.scope == scope && m.condition.matches(context))
            .map(|m| m.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SkillContext {
        SkillContext {
            holder_class: UnitClass::Infantry,
            holder_elite_level: 1,
            opponent_class: UnitClass::Armor,
            weapon_category: Some(WeaponCategory::AntiTank),
        }
    }

    #[test]
    fn empty_condition_matches() {
        assert!(SkillCondition::default().matches(&context()));
    }

    #[test]
    fn class_and_elite_filters() {
        let condition = SkillCondition {
            opponent_classes: Some(vec![UnitClass::Armor]),
            min_elite_level: 2,
            ..SkillCondition::default()
        };
        assert!(!condition.matches(&context()));

        let veteran = SkillContext {
            holder_elite_level: 2,
            ..context()
        };
        assert!(condition.matches(&veteran));
    }

    #[test]
    fn weapon_filter_needs_a_weapon() {
        let condition = SkillCondition {
            weapon_categories: Some(vec![WeaponCategory::AntiTank]),
            ..SkillCondition::default()
        };
        assert!(condition.matches(&context()));

        let unarmed = SkillContext {
            weapon_category: None,
            ..context()
        };
        assert!(!condition.matches(&unarmed));
    }

    #[test]
    fn bonus_sums_matching_modifiers() {
        let tank_hunter = SkillProfile::new("tank_hunter")
            .with_modifier(SkillModifier::new(ModifierStat::Attack, ModifierScope::Own, 2))
            .with_modifier(
                SkillModifier::new(ModifierStat::Attack, ModifierScope::Own, 1).when(
                    SkillCondition {
                        opponent_classes: Some(vec![UnitClass::Armor]),
                        ..SkillCondition::default()
                    },
                ),
            )
            .with_modifier(SkillModifier::new(
                ModifierStat::Defense,
                ModifierScope::Opponent,
                -1,
            ));

        let ctx = context();
        assert_eq!(tank_hunter.bonus(ModifierStat::Attack, ModifierScope::Own, &ctx), 3);
        assert_eq!(tank_hunter.bonus(ModifierStat::Defense, ModifierScope::Own, &ctx), 0);
        assert_eq!(
            tank_hunter.bonus(ModifierStat::Defense, ModifierScope::Opponent, &ctx),
            -1
        );
    }
}

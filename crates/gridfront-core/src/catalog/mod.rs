//! Read-only rules catalogs.
//!
//! Catalog data arrives as plain records ([`CatalogData`]), typically
//! deserialized from JSON. [`Catalogs::build`] validates the records once
//! and indexes them into hash maps, so every lookup during a match is a
//! single map access.
//!
//! # Example
//!
//! ```
//! use gridfront_core::catalog::{CatalogData, Catalogs, WeaponCategory, WeaponId, WeaponProfile};
//!
//! let mut data = CatalogData::default();
//! data.weapons.push(WeaponProfile::new("rifle", WeaponCategory::SmallArms, 3));
//!
//! let catalogs = Catalogs::build(data).unwrap();
//! assert_eq!(catalogs.weapon(&WeaponId::new("rifle")).unwrap().power, 3);
//! assert!(catalogs.weapon(&WeaponId::new("mortar")).is_err());
//! ```

pub mod matchup;
pub mod positional;
pub mod site;
pub mod skill;
pub mod weapon;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::error::{Result, RulesError};
use crate::layer::Layer;
use crate::resolver::outcome::DpqOutcomeMatrix;
use crate::unit::{Unit, UnitClass};

pub use matchup::{AttackRule, DefenseRule, WeaponPriority};
pub use positional::{AirHeightProfile, DpqTier};
pub use site::{ConstructionProfile, FeatureProfile, SiteFeature, StructureProfile, TerrainProfile};
pub use skill::{
    ModifierScope, ModifierStat, SkillCondition, SkillContext, SkillModifier, SkillProfile,
};
pub use weapon::{Trajectories, Trajectory, WeaponCategory, WeaponProfile};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from a string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a weapon profile.
    WeaponId
);
catalog_id!(
    /// Identifier of a skill.
    SkillId
);
catalog_id!(
    /// Identifier of a terrain type.
    TerrainId
);
catalog_id!(
    /// Identifier of a structure type.
    StructureId
);
catalog_id!(
    /// Identifier of a construction type.
    ConstructionId
);
catalog_id!(
    /// Identifier of a positional-quality tier.
    DpqId
);

/// Names a catalog in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    /// Weapon profiles.
    Weapon,
    /// Skills.
    Skill,
    /// Terrain types.
    Terrain,
    /// Structure types.
    Structure,
    /// Construction types.
    Construction,
    /// Positional-quality tiers.
    DpqTier,
    /// Air-height overrides.
    AirHeight,
    /// Attack bonus rules.
    AttackRule,
    /// Defense bonus rules.
    DefenseRule,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weapon => "weapon",
            Self::Skill => "skill",
            Self::Terrain => "terrain",
            Self::Structure => "structure",
            Self::Construction => "construction",
            Self::DpqTier => "dpq tier",
            Self::AirHeight => "air height",
            Self::AttackRule => "attack rule",
            Self::DefenseRule => "defense rule",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Catalog Data
// =============================================================================

/// Unindexed catalog records, as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    /// Weapon profiles.
    pub weapons: Vec<WeaponProfile>,
    /// Skills.
    pub skills: Vec<SkillProfile>,
    /// Terrain types.
    pub terrains: Vec<TerrainProfile>,
    /// Structure types.
    pub structures: Vec<StructureProfile>,
    /// Construction types.
    pub constructions: Vec<ConstructionProfile>,
    /// Positional-quality tiers.
    pub dpq_tiers: Vec<DpqTier>,
    /// Tier used where nothing on a cell grants one. Open ground if unset.
    pub default_dpq: Option<DpqId>,
    /// Air-height overrides, one per flight layer.
    pub air_heights: Vec<AirHeightProfile>,
    /// Attack bonus rules.
    pub attack_rules: Vec<AttackRule>,
    /// Defense bonus rules.
    pub defense_rules: Vec<DefenseRule>,
    /// Preferred-target table.
    pub weapon_priorities: Vec<WeaponPriority>,
    /// Outcome matrix.
    pub outcome_matrix: DpqOutcomeMatrix,
}

impl CatalogData {
    /// Parses catalog records from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Serde`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Catalogs
// =============================================================================

/// Validated, indexed catalogs. Immutable for the duration of a match.
#[derive(Debug, Clone)]
pub struct Catalogs {
    weapons: HashMap<WeaponId, WeaponProfile>,
    skills: HashMap<SkillId, SkillProfile>,
    terrains: HashMap<TerrainId, TerrainProfile>,
    structures: HashMap<StructureId, StructureProfile>,
    constructions: HashMap<ConstructionId, ConstructionProfile>,
    dpq_tiers: HashMap<DpqId, DpqTier>,
    default_dpq: DpqTier,
    air_heights: HashMap<Layer, AirHeightProfile>,
    attack_rules: HashMap<(UnitClass, WeaponCategory, UnitClass), AttackRule>,
    defense_rules: HashMap<(UnitClass, UnitClass, WeaponCategory), DefenseRule>,
    weapon_priorities: HashSet<(WeaponCategory, UnitClass)>,
    outcome_matrix: DpqOutcomeMatrix,
}

fn index<K, V>(
    records: Vec<V>,
    kind: CatalogKind,
    key: impl Fn(&V) -> K,
) -> Result<HashMap<K, V>>
where
    K: Eq + Hash + fmt::Debug,
{
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        let k = key(&record);
        if map.contains_key(&k) {
            return Err(RulesError::DuplicateCatalogEntry {
                kind,
                id: format!("{k:?}"),
            });
        }
        map.insert(k, record);
    }
    Ok(map)
}

fn missing(kind: CatalogKind, id: &impl fmt::Display) -> RulesError {
    RulesError::CatalogEntryNotFound {
        kind,
        id: id.to_string(),
    }
}

impl Catalogs {
    /// Validates and indexes catalog records.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::DuplicateCatalogEntry`] if two records share a
    /// key, and [`RulesError::CatalogEntryNotFound`] if a record refers to a
    /// tier, skill or terrain that does not exist.
    pub fn build(data: CatalogData) -> Result<Self> {
        let dpq_tiers = index(data.dpq_tiers, CatalogKind::DpqTier, |t| t.id.clone())?;
        let skills = index(data.skills, CatalogKind::Skill, |s| s.id.clone())?;
        let terrains = index(data.terrains, CatalogKind::Terrain, |t| t.id.clone())?;
        let structures = index(data.structures, CatalogKind::Structure, |s| s.id.clone())?;
        let constructions =
            index(data.constructions, CatalogKind::Construction, |c| c.id.clone())?;
        let air_heights = index(data.air_heights, CatalogKind::AirHeight, |a| a.layer)?;

        let check_dpq = |dpq: Option<&DpqId>| match dpq {
            Some(id) if !dpq_tiers.contains_key(id) => Err(missing(CatalogKind::DpqTier, id)),
            _ => Ok(()),
        };
        for terrain in terrains.values() {
            check_dpq(terrain.dpq.as_ref())?;
            if let Some(skill) = &terrain.fallback_skill {
                if !skills.contains_key(skill) {
                    return Err(missing(CatalogKind::Skill, skill));
                }
            }
        }
        for structure in structures.values() {
            check_dpq(structure.dpq.as_ref())?;
        }
        for construction in constructions.values() {
            check_dpq(construction.dpq.as_ref())?;
        }
        for air in air_heights.values() {
            check_dpq(Some(&air.dpq))?;
        }
        for skill in skills.values() {
            if let Some(terrain) = skill
                .terrain_cost_overrides
                .keys()
                .find(|t| !terrains.contains_key(*t))
            {
                return Err(missing(CatalogKind::Terrain, terrain));
            }
        }

        let default_dpq = match data.default_dpq {
            Some(id) => dpq_tiers
                .get(&id)
                .cloned()
                .ok_or_else(|| missing(CatalogKind::DpqTier, &id))?,
            None => DpqTier::open_ground(),
        };

        let catalogs = Self {
            weapons: index(data.weapons, CatalogKind::Weapon, |w| w.id.clone())?,
            skills,
            terrains,
            structures,
            constructions,
            dpq_tiers,
            default_dpq,
            air_heights,
            attack_rules: index(data.attack_rules, CatalogKind::AttackRule, AttackRule::key)?,
            defense_rules: index(data.defense_rules, CatalogKind::DefenseRule, DefenseRule::key)?,
            weapon_priorities: data
                .weapon_priorities
                .into_iter()
                .map(|p| (p.weapon, p.target))
                .collect(),
            outcome_matrix: data.outcome_matrix,
        };

        tracing::debug!(
            weapons = catalogs.weapons.len(),
            terrains = catalogs.terrains.len(),
            skills = catalogs.skills.len(),
            "catalogs built"
        );
        Ok(catalogs)
    }

    /// Parses and builds catalogs from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Serde`] for malformed JSON and any error
    /// [`Catalogs::build`] reports.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::build(CatalogData::from_json(json)?)
    }

    /// Looks up a weapon profile.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CatalogEntryNotFound`] for unknown ids.
    pub fn weapon(&self, id: &WeaponId) -> Result<&WeaponProfile> {
        self.weapons
            .get(id)
            .ok_or_else(|| missing(CatalogKind::Weapon, id))
    }

    /// Looks up a skill.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CatalogEntryNotFound`] for unknown ids.
    pub fn skill(&self, id: &SkillId) -> Result<&SkillProfile> {
        self.skills
            .get(id)
            .ok_or_else(|| missing(CatalogKind::Skill, id))
    }

    /// Looks up a terrain type.
    #[must_use]
    pub fn terrain(&self, id: &TerrainId) -> Option<&TerrainProfile> {
        self.terrains.get(id)
    }

    /// Looks up a structure type.
    #[must_use]
    pub fn structure(&self, id: &StructureId) -> Option<&StructureProfile> {
        self.structures.get(id)
    }

    /// Looks up a construction type.
    #[must_use]
    pub fn construction(&self, id: &ConstructionId) -> Option<&ConstructionProfile> {
        self.constructions.get(id)
    }

    /// Looks up a positional-quality tier.
    #[must_use]
    pub fn dpq(&self, id: &DpqId) -> Option<&DpqTier> {
        self.dpq_tiers.get(id)
    }

    /// The tier used where nothing grants one.
    #[must_use]
    pub const fn default_dpq(&self) -> &DpqTier {
        &self.default_dpq
    }

    /// The air-height override for a flight layer.
    #[must_use]
    pub fn air_height(&self, layer: Layer) -> Option<&AirHeightProfile> {
        self.air_heights.get(&layer)
    }

    /// Attack bonus for (attacker class, weapon category, defender class).
    #[must_use]
    pub fn attack_bonus(
        &self,
        attacker: UnitClass,
        weapon: WeaponCategory,
        defender: UnitClass,
    ) -> i32 {
        self.attack_rules
            .get(&(attacker, weapon, defender))
            .map_or(0, |rule| rule.bonus)
    }

    /// Defense bonus for (defender class, attacker class, weapon category).
    #[must_use]
    pub fn defense_bonus(
        &self,
        defender: UnitClass,
        attacker: UnitClass,
        weapon: WeaponCategory,
    ) -> i32 {
        self.defense_rules
            .get(&(defender, attacker, weapon))
            .map_or(0, |rule| rule.bonus)
    }

    /// Returns `true` if `target` is a preferred target of `weapon`.
    #[must_use]
    pub fn is_preferred_target(&self, weapon: WeaponCategory, target: UnitClass) -> bool {
        self.weapon_priorities.contains(&(weapon, target))
    }

    /// The DPQ outcome matrix.
    #[must_use]
    pub const fn outcome_matrix(&self) -> &DpqOutcomeMatrix {
        &self.outcome_matrix
    }

    /// Net skill modifier to `stat` of `unit` when it faces `opponent`.
    ///
    /// Sums the unit's own-scope modifiers and the opponent's
    /// opponent-scope modifiers. `weapon` is the category of the weapon fired
    /// in this exchange, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CatalogEntryNotFound`] if either unit holds an
    /// unknown skill.
    pub fn net_skill_bonus(
        &self,
        stat: ModifierStat,
        unit: &Unit,
        opponent: &Unit,
        weapon: Option<WeaponCategory>,
    ) -> Result<i32> {
        let own_context = SkillContext {
            holder_class: unit.class,
            holder_elite_level: unit.combat.elite_level,
            opponent_class: opponent.class,
            weapon_category: weapon,
        };
        let opponent_context = SkillContext {
            holder_class: opponent.class,
            holder_elite_level: opponent.combat.elite_level,
            opponent_class: unit.class,
            weapon_category: weapon,
        };

        let mut total = 0;
        for id in &unit.skills {
            total = self
                .skill(id)?
                .bonus(stat, ModifierScope::Own, &own_context)
                .saturating_add(total);
        }
        for id in &opponent.skills {
            total = self
                .skill(id)?
                .bonus(stat, ModifierScope::Opponent, &opponent_context)
                .saturating_add(total);
        }
        Ok(total)
    }

    /// Boarding fallback cost of `terrain` for a passenger holding `skills`:
    /// the lowest override among the skills, else the terrain's autonomy cost.
    #[must_use]
    pub fn autonomy_cost(&self, terrain: &TerrainProfile, skills: &[SkillId]) -> u32 {
        skills
            .iter()
            .filter_map(|id| self.skills.get(id))
            .filter_map(|skill| skill.terrain_cost_overrides.get(&terrain.id).copied())
            .min()
            .unwrap_or(terrain.autonomy_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerMask;
    use crate::unit::{Team, UnitId, UnitSpec};
    use hexfield::HexCell;

    fn unit(class: UnitClass, skills: &[&str]) -> Unit {
        let mut spec = UnitSpec::new(Team::new(1), class, Layer::Land, HexCell::ORIGIN);
        for skill in skills {
            spec = spec.with_skill(SkillId::new(*skill));
        }
        Unit::from_spec(UnitId::new(0), spec)
    }

    mod id_tests {
        use super::*;

        #[test]
        fn ids_are_transparent_strings() {
            let id = WeaponId::from("rifle");
            assert_eq!(id.as_str(), "rifle");
            assert_eq!(serde_json::to_string(&id).unwrap(), "\"rifle\"");
            assert_eq!(format!("{id}"), "rifle");
        }
    }

    mod build_tests {
        use super::*;

        #[test]
        fn empty_data_builds() {
            let catalogs = Catalogs::build(CatalogData::default()).unwrap();
            assert_eq!(catalogs.default_dpq().points, 0);
            assert!(catalogs.air_height(Layer::AirLow).is_none());
        }

        #[test]
        fn duplicate_ids_are_rejected() {
            let mut data = CatalogData::default();
            data.weapons
                .push(WeaponProfile::new("rifle", WeaponCategory::SmallArms, 3));
            data.weapons
                .push(WeaponProfile::new("rifle", WeaponCategory::SmallArms, 4));
            let err = Catalogs::build(data).unwrap_err();
            assert!(matches!(
                err,
                RulesError::DuplicateCatalogEntry {
                    kind: CatalogKind::Weapon,
                    ..
                }
            ));
        }

        #[test]
        fn dangling_tier_is_rejected() {
            let mut data = CatalogData::default();
            data.terrains
                .push(TerrainProfile::new("forest").with_dpq("covered"));
            let err = Catalogs::build(data).unwrap_err();
            assert_eq!(err.to_string(), "dpq tier not found in catalog: covered");
        }

        #[test]
        fn dangling_default_tier_is_rejected() {
            let data = CatalogData {
                default_dpq: Some(DpqId::new("nowhere")),
                ..CatalogData::default()
            };
            assert!(Catalogs::build(data).is_err());
        }

        #[test]
        fn override_for_unknown_terrain_is_rejected() {
            let mut data = CatalogData::default();
            data.skills
                .push(SkillProfile::new("amphibious").with_cost_override("swamp", 1));
            let err = Catalogs::build(data).unwrap_err();
            assert_eq!(err.to_string(), "terrain not found in catalog: swamp");
        }

        #[test]
        fn from_json() {
            let json = r#"{
                "weapons": [
                    { "id": "rifle", "category": "SmallArms", "power": 3 }
                ],
                "dpq_tiers": [
                    { "id": "open", "points": 0, "defense_bonus": 0 },
                    { "id": "high", "points": 2, "defense_bonus": 2 }
                ],
                "default_dpq": "open",
                "air_heights": [
                    { "layer": "AirHigh", "dpq": "high", "vision": 6 }
                ],
                "attack_rules": [
                    { "attacker": "Armor", "weapon": "Cannon", "defender": "Infantry", "bonus": 2 }
                ],
                "weapon_priorities": [
                    { "weapon": "AntiTank", "target": "Armor" }
                ]
            }"#;
            let catalogs = Catalogs::from_json(json).unwrap();
            assert_eq!(catalogs.weapon(&WeaponId::new("rifle")).unwrap().power, 3);
            assert_eq!(catalogs.air_height(Layer::AirHigh).unwrap().vision, 6);
            assert_eq!(
                catalogs.attack_bonus(UnitClass::Armor, WeaponCategory::Cannon, UnitClass::Infantry),
                2
            );
            assert_eq!(
                catalogs.attack_bonus(UnitClass::Infantry, WeaponCategory::Cannon, UnitClass::Armor),
                0
            );
            assert!(catalogs.is_preferred_target(WeaponCategory::AntiTank, UnitClass::Armor));
        }

        #[test]
        fn malformed_json() {
            assert!(matches!(
                Catalogs::from_json("{ weapons: }"),
                Err(RulesError::Serde(_))
            ));
        }
    }

    mod skill_tests {
        use super::*;

        fn catalogs() -> Catalogs {
            let mut data = CatalogData::default();
            data.terrains.push(TerrainProfile::new("sea"));
            data.skills.push(
                SkillProfile::new("ambush")
                    .with_modifier(SkillModifier::new(ModifierStat::Attack, ModifierScope::Own, 2)),
            );
            data.skills.push(SkillProfile::new("armored").with_modifier(SkillModifier::new(
                ModifierStat::Attack,
                ModifierScope::Opponent,
                -1,
            )));
            data.skills
                .push(SkillProfile::new("marine").with_cost_override("sea", 2));
            data.skills
                .push(SkillProfile::new("raider").with_cost_override("sea", 1));
            Catalogs::build(data).unwrap()
        }

        #[test]
        fn net_bonus_combines_both_sides() {
            let catalogs = catalogs();
            let attacker = unit(UnitClass::Infantry, &["ambush"]);
            let defender = unit(UnitClass::Armor, &["armored"]);
            let net = catalogs
                .net_skill_bonus(ModifierStat::Attack, &attacker, &defender, None)
                .unwrap();
            assert_eq!(net, 1);

            let reverse = catalogs
                .net_skill_bonus(ModifierStat::Attack, &defender, &attacker, None)
                .unwrap();
            assert_eq!(reverse, 0);
        }

        #[test]
        fn unknown_skill_is_an_error() {
            let catalogs = catalogs();
            let attacker = unit(UnitClass::Infantry, &["ghost"]);
            let defender = unit(UnitClass::Armor, &[]);
            assert!(catalogs
                .net_skill_bonus(ModifierStat::Defense, &attacker, &defender, None)
                .is_err());
        }

        #[test]
        fn autonomy_cost_uses_lowest_override() {
            let catalogs = catalogs();
            let sea = TerrainProfile::new("sea")
                .with_autonomy(4, None)
                .with_embark_layers(LayerMask::LAND);
            assert_eq!(catalogs.autonomy_cost(&sea, &[]), 4);
            assert_eq!(catalogs.autonomy_cost(&sea, &[SkillId::new("marine")]), 2);
            assert_eq!(
                catalogs.autonomy_cost(&sea, &[SkillId::new("marine"), SkillId::new("raider")]),
                1
            );
        }
    }
}

//! Terrain, structures and constructions.
//!
//! Everything that can stand on a cell implements [`SiteFeature`]. When a
//! cell carries several features the rules consult them in priority order:
//! construction, then structure, then terrain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ConstructionId, DpqId, SkillId, StructureId, TerrainId};
use crate::layer::{Domain, LayerMask};

/// Read interface shared by terrain and the features built on it.
pub trait SiteFeature {
    /// Effective vision (occlusion height) of the feature.
    fn vision(&self) -> i32;

    /// Positional-quality tier granted to an occupant, if any.
    fn dpq(&self) -> Option<&DpqId>;

    /// Occupant layers the feature applies to.
    fn layers(&self) -> LayerMask;

    /// Passenger layers that may embark into a transporter on this feature.
    fn embark_layers(&self) -> LayerMask;
}

/// Static description of a terrain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainProfile {
    /// Catalog id.
    pub id: TerrainId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Effective vision.
    #[serde(default)]
    pub vision: i32,
    /// Positional-quality tier.
    #[serde(default)]
    pub dpq: Option<DpqId>,
    /// Occupant layers the terrain applies to.
    #[serde(default = "LayerMask::all")]
    pub layers: LayerMask,
    /// Projectile layers that may cross the terrain.
    #[serde(default = "LayerMask::all")]
    pub fire_passable: LayerMask,
    /// Passenger layers that may embark here.
    #[serde(default = "LayerMask::all")]
    pub embark_layers: LayerMask,
    /// Cost to enter, per movement domain. Domains without an entry cannot
    /// enter normally.
    #[serde(default)]
    pub movement_costs: BTreeMap<Domain, u32>,
    /// Cost to enter when boarding a transporter on a cell the passenger could
    /// not otherwise enter.
    #[serde(default = "default_autonomy_cost")]
    pub autonomy_cost: u32,
    /// Skill a passenger needs for the boarding fallback to apply.
    #[serde(default)]
    pub fallback_skill: Option<SkillId>,
}

const fn default_autonomy_cost() -> u32 {
    1
}

impl TerrainProfile {
    /// Open terrain every layer may occupy, cross and embark on, with no
    /// normal movement costs.
    #[must_use]
    pub fn new(id: impl Into<TerrainId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            vision: 0,
            dpq: None,
            layers: LayerMask::all(),
            fire_passable: LayerMask::all(),
            embark_layers: LayerMask::all(),
            movement_costs: BTreeMap::new(),
            autonomy_cost: default_autonomy_cost(),
            fallback_skill: None,
        }
    }

    /// Sets the effective vision.
    #[must_use]
    pub const fn with_vision(mut self, vision: i32) -> Self {
        self.vision = vision;
        self
    }

    /// Sets the positional-quality tier.
    #[must_use]
    pub fn with_dpq(mut self, dpq: impl Into<DpqId>) -> Self {
        self.dpq = Some(dpq.into());
        self
    }

    /// Sets the occupant layers.
    #[must_use]
    pub const fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the projectile layers that may cross.
    #[must_use]
    pub const fn with_fire_passable(mut self, layers: LayerMask) -> Self {
        self.fire_passable = layers;
        self
    }

    /// Sets the embarkable passenger layers.
    #[must_use]
    pub const fn with_embark_layers(mut self, layers: LayerMask) -> Self {
        self.embark_layers = layers;
        self
    }

    /// Sets the normal movement cost for a domain.
    #[must_use]
    pub fn with_movement_cost(mut self, domain: Domain, cost: u32) -> Self {
        self.movement_costs.insert(domain, cost);
        self
    }

    /// Sets the boarding fallback cost and the skill it requires.
    #[must_use]
    pub fn with_autonomy(mut self, cost: u32, skill: Option<SkillId>) -> Self {
        self.autonomy_cost = cost;
        self.fallback_skill = skill;
        self
    }

    /// Normal cost for a `domain` unit to enter, if it can.
    #[must_use]
    pub fn movement_cost(&self, domain: Domain) -> Option<u32> {
        self.movement_costs.get(&domain).copied()
    }
}

impl SiteFeature for TerrainProfile {
    fn vision(&self) -> i32 {
        self.vision
    }

    fn dpq(&self) -> Option<&DpqId> {
        self.dpq.as_ref()
    }

    fn layers(&self) -> LayerMask {
        self.layers
    }

    fn embark_layers(&self) -> LayerMask {
        self.embark_layers
    }
}

/// A structure or construction standing on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProfile<I> {
    /// Catalog id.
    pub id: I,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Effective vision.
    #[serde(default)]
    pub vision: i32,
    /// Positional-quality tier.
    #[serde(default)]
    pub dpq: Option<DpqId>,
    /// Occupant layers the feature applies to.
    #[serde(default = "LayerMask::all")]
    pub layers: LayerMask,
    /// Passenger layers that may embark here.
    #[serde(default = "LayerMask::all")]
    pub embark_layers: LayerMask,
}

/// Natural or pre-placed structures (villages, bridges, bunkers).
pub type StructureProfile = FeatureProfile<StructureId>;

/// Player-built constructions (trenches, pontoons, airstrips).
pub type ConstructionProfile = FeatureProfile<ConstructionId>;

impl<I: std::fmt::Display> FeatureProfile<I> {
    /// A feature applying to every layer, with no vision and no tier.
    #[must_use]
    pub fn new(id: impl Into<I>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            vision: 0,
            dpq: None,
            layers: LayerMask::all(),
            embark_layers: LayerMask::all(),
        }
    }

    /// Sets the effective vision.
    #[must_use]
    pub fn with_vision(mut self, vision: i32) -> Self {
        self.vision = vision;
        self
    }

    /// Sets the positional-quality tier.
    #[must_use]
    pub fn with_dpq(mut self, dpq: impl Into<DpqId>) -> Self {
        self.dpq = Some(dpq.into());
        self
    }

    /// Sets the occupant layers.
    #[must_use]
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the embarkable passenger layers.
    #[must_use]
    pub fn with_embark_layers(mut self, layers: LayerMask) -> Self {
        self.embark_layers = layers;
        self
    }
}

impl<I> SiteFeature for FeatureProfile<I> {
    fn vision(&self) -> i32 {
        self.vision
    }

    fn dpq(&self) -> Option<&DpqId> {
        self.dpq.as_ref()
    }

    fn layers(&self) -> LayerMask {
        self.layers
    }

    fn embark_layers(&self) -> LayerMask {
        self.embark_layers
    }
}

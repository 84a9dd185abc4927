//! Weapon profiles.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::WeaponId;
use crate::layer::{Layer, LayerMask};

/// How a projectile travels to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trajectory {
    /// Direct fire; subject to line-of-fire occlusion.
    Straight,
    /// Indirect fire; ignores occlusion along the path.
    Parabolic,
}

impl Trajectory {
    /// The single-trajectory set for this trajectory.
    #[must_use]
    pub const fn as_flag(self) -> Trajectories {
        match self {
            Self::Straight => Trajectories::STRAIGHT,
            Self::Parabolic => Trajectories::PARABOLIC,
        }
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Parabolic => write!(f, "parabolic"),
        }
    }
}

bitflags! {
    /// Trajectories a weapon profile supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Trajectories: u8 {
        /// Direct fire.
        const STRAIGHT = 1 << 0;
        /// Indirect fire.
        const PARABOLIC = 1 << 1;
    }
}

impl Trajectories {
    /// Returns `true` if `trajectory` is in the set.
    #[must_use]
    pub const fn supports(self, trajectory: Trajectory) -> bool {
        self.contains(trajectory.as_flag())
    }

    /// The trajectory a newly mounted weapon uses: straight when available.
    #[must_use]
    pub const fn preferred(self) -> Option<Trajectory> {
        if self.supports(Trajectory::Straight) {
            Some(Trajectory::Straight)
        } else if self.supports(Trajectory::Parabolic) {
            Some(Trajectory::Parabolic)
        } else {
            None
        }
    }
}

impl Default for Trajectories {
    fn default() -> Self {
        Self::STRAIGHT
    }
}

/// Weapon category, the key of matchup and priority tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponCategory {
    /// Rifles and carbines.
    SmallArms,
    /// Crew-served automatic weapons.
    MachineGun,
    /// Rockets and missiles aimed at armour.
    AntiTank,
    /// Direct-fire guns.
    Cannon,
    /// Howitzers and mortars.
    Artillery,
    /// Unguided rocket salvoes.
    Rocket,
    /// Surface-to-air guns and missiles.
    AntiAir,
    /// Air-to-air missiles and guns.
    AirToAir,
    /// Bombs and air-to-surface missiles.
    AirToGround,
    /// Ship-mounted guns.
    NavalGun,
    /// Torpedoes.
    Torpedo,
    /// Depth charges.
    DepthCharge,
}

/// Static description of a weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Catalog id.
    pub id: WeaponId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Matchup category.
    pub category: WeaponCategory,
    /// Base power per HP of the firing unit.
    pub power: i32,
    /// Native minimum range.
    #[serde(default = "default_range")]
    pub min_range: u32,
    /// Native maximum range.
    #[serde(default = "default_range")]
    pub max_range: u32,
    /// Supported trajectories.
    #[serde(default)]
    pub trajectories: Trajectories,
    /// Layers the weapon can engage.
    #[serde(default = "default_targets")]
    pub targets: LayerMask,
    /// Layer the projectile crosses, checked against terrain passability.
    #[serde(default = "default_travel_layer")]
    pub travel_layer: Layer,
    /// Magazine size of a freshly mounted instance.
    #[serde(default = "default_ammo_capacity")]
    pub ammo_capacity: u32,
}

const fn default_range() -> u32 {
    1
}

const fn default_targets() -> LayerMask {
    LayerMask::SURFACE
}

const fn default_travel_layer() -> Layer {
    Layer::Land
}

const fn default_ammo_capacity() -> u32 {
    10
}

impl WeaponProfile {
    /// A short-range, straight-firing weapon against surface targets.
    #[must_use]
    pub fn new(id: impl Into<WeaponId>, category: WeaponCategory, power: i32) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            category,
            power,
            min_range: default_range(),
            max_range: default_range(),
            trajectories: Trajectories::default(),
            targets: default_targets(),
            travel_layer: default_travel_layer(),
            ammo_capacity: default_ammo_capacity(),
        }
    }

    /// Sets the native range bracket.
    #[must_use]
    pub const fn with_range(mut self, min_range: u32, max_range: u32) -> Self {
        self.min_range = min_range;
        self.max_range = max_range;
        self
    }

    /// Sets the supported trajectories.
    #[must_use]
    pub const fn with_trajectories(mut self, trajectories: Trajectories) -> Self {
        self.trajectories = trajectories;
        self
    }

    /// Sets the layers the weapon can engage.
    #[must_use]
    pub const fn with_targets(mut self, targets: LayerMask) -> Self {
        self.targets = targets;
        self
    }

    /// Sets the layer the projectile travels through.
    #[must_use]
    pub const fn with_travel_layer(mut self, layer: Layer) -> Self {
        self.travel_layer = layer;
        self
    }

    /// Sets the magazine size.
    #[must_use]
    pub const fn with_ammo_capacity(mut self, ammo_capacity: u32) -> Self {
        self.ammo_capacity = ammo_capacity;
        self
    }

    /// Returns `true` if the weapon can engage a unit on `layer`.
    #[must_use]
    pub const fn can_engage(&self, layer: Layer) -> bool {
        self.targets.admits(layer)
    }
}

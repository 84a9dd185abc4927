//! Positional quality (DPQ) tiers and the air-height override table.

use serde::{Deserialize, Serialize};

use super::DpqId;
use crate::layer::Layer;

/// A named positional-quality tier.
///
/// `points` feed the outcome matrix; `defense_bonus` is added to the
/// defense of a unit standing in this position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpqTier {
    /// Catalog id.
    pub id: DpqId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Points compared against the opponent's.
    pub points: i32,
    /// Defense added to the occupying unit.
    pub defense_bonus: i32,
}

impl DpqTier {
    /// Creates a tier.
    #[must_use]
    pub fn new(id: impl Into<DpqId>, points: i32, defense_bonus: i32) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            points,
            defense_bonus,
        }
    }

    /// The tier used when nothing on a cell carries one.
    #[must_use]
    pub fn open_ground() -> Self {
        Self::new("open", 0, 0)
    }
}

/// Positional quality and vision of an airborne unit, per flight layer.
///
/// Airborne units ignore whatever is on the cell below them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirHeightProfile {
    /// The flight layer this entry describes.
    pub layer: Layer,
    /// Tier applied to units flying at this layer.
    pub dpq: DpqId,
    /// Effective vision at this layer.
    pub vision: i32,
}

impl AirHeightProfile {
    /// Creates an entry.
    #[must_use]
    pub fn new(layer: Layer, dpq: impl Into<DpqId>, vision: i32) -> Self {
        Self {
            layer,
            dpq: dpq.into(),
            vision,
        }
    }
}

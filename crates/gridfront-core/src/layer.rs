//! Movement domains and height bands.
//!
//! A [`Layer`] is the combination of a movement [`Domain`] and a height band.
//! Only the combinations the rules know about are representable. Weapons,
//! terrain, site features and transport slots describe the layers they accept
//! with a [`LayerMask`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement domain of a unit or layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    /// Ground units.
    Land,
    /// Surface vessels.
    Naval,
    /// Submerged vessels.
    Submarine,
    /// Aircraft in flight.
    Air,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Land => write!(f, "Land"),
            Self::Naval => write!(f, "Naval"),
            Self::Submarine => write!(f, "Submarine"),
            Self::Air => write!(f, "Air"),
        }
    }
}

/// Domain plus height band a unit currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    /// On the ground. Landed aircraft are here too.
    Land,
    /// On the water surface.
    Naval,
    /// Below the water surface.
    Submarine,
    /// Nap-of-the-earth flight.
    AirLow,
    /// Medium altitude.
    AirMedium,
    /// High altitude.
    AirHigh,
}

impl Layer {
    /// All layers in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Land,
        Self::Naval,
        Self::Submarine,
        Self::AirLow,
        Self::AirMedium,
        Self::AirHigh,
    ];

    /// The movement domain of this layer.
    #[must_use]
    pub const fn domain(self) -> Domain {
        match self {
            Self::Land => Domain::Land,
            Self::Naval => Domain::Naval,
            Self::Submarine => Domain::Submarine,
            Self::AirLow | Self::AirMedium | Self::AirHigh => Domain::Air,
        }
    }

    /// Returns `true` for the flying layers.
    #[must_use]
    pub const fn is_airborne(self) -> bool {
        matches!(self.domain(), Domain::Air)
    }

    /// The single-layer mask for this layer.
    #[must_use]
    pub const fn mask(self) -> LayerMask {
        match self {
            Self::Land => LayerMask::LAND,
            Self::Naval => LayerMask::NAVAL,
            Self::Submarine => LayerMask::SUBMARINE,
            Self::AirLow => LayerMask::AIR_LOW,
            Self::AirMedium => LayerMask::AIR_MEDIUM,
            Self::AirHigh => LayerMask::AIR_HIGH,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Land => write!(f, "Land"),
            Self::Naval => write!(f, "Naval"),
            Self::Submarine => write!(f, "Submarine"),
            Self::AirLow => write!(f, "Air (low)"),
            Self::AirMedium => write!(f, "Air (medium)"),
            Self::AirHigh => write!(f, "Air (high)"),
        }
    }
}

bitflags! {
    /// A set of layers.
    ///
    /// ```
    /// use gridfront_core::layer::{Layer, LayerMask};
    ///
    /// let surface = LayerMask::LAND | LayerMask::NAVAL;
    /// assert!(surface.admits(Layer::Naval));
    /// assert!(!surface.admits(Layer::AirLow));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct LayerMask: u8 {
        /// Ground.
        const LAND = 1 << 0;
        /// Water surface.
        const NAVAL = 1 << 1;
        /// Submerged.
        const SUBMARINE = 1 << 2;
        /// Low flight.
        const AIR_LOW = 1 << 3;
        /// Medium flight.
        const AIR_MEDIUM = 1 << 4;
        /// High flight.
        const AIR_HIGH = 1 << 5;
        /// Every flying layer.
        const AIR = Self::AIR_LOW.bits() | Self::AIR_MEDIUM.bits() | Self::AIR_HIGH.bits();
        /// Land and water surface.
        const SURFACE = Self::LAND.bits() | Self::NAVAL.bits();
    }
}

impl LayerMask {
    /// Returns `true` if `layer` is in the set.
    #[must_use]
    pub const fn admits(self, layer: Layer) -> bool {
        self.contains(layer.mask())
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

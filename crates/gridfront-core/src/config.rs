//! Rules configuration.

use hexfield::SightConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::outcome::RoundingTable;

/// Tunable constants of the rules.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes.
///
/// # Example
///
/// ```
/// use gridfront_core::config::RulesConfig;
///
/// let config = RulesConfig::from_json(r#"{ "minimum_defense": 2 }"#).unwrap();
/// assert_eq!(config.minimum_defense, 2);
/// assert_eq!(config.sight.exception_margin, 2);
/// assert!(config.always_allow_air);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Line-of-fire settings, including the supreme-elevation margin.
    pub sight: SightConfig,
    /// Projectiles travelling through the air ignore terrain passability.
    pub always_allow_air: bool,
    /// Floor applied to effective defense before it divides attack.
    pub minimum_defense: i32,
    /// Rounding of eliminations per combat outcome.
    pub rounding: RoundingTable,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            sight: SightConfig::default(),
            always_allow_air: true,
            minimum_defense: 1,
            rounding: RoundingTable::default(),
        }
    }
}

impl RulesConfig {
    /// Creates a configuration with a custom supreme-elevation margin.
    #[must_use]
    pub fn with_exception_margin(exception_margin: i32) -> Self {
        Self {
            sight: SightConfig { exception_margin },
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Serde`](crate::error::RulesError::Serde) if the
    /// JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

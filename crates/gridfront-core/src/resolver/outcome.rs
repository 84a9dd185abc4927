//! Positional matchup classification and outcome-dependent rounding.
//!
//! The [`DpqOutcomeMatrix`] turns the two sides' positional-quality points
//! into a [`CombatOutcome`]. The [`RoundingTable`] then picks, per outcome,
//! how the raw elimination quotient of each strike becomes an integer.
//!
//! # Example
//!
//! ```
//! use gridfront_core::resolver::outcome::{CombatOutcome, DpqOutcomeMatrix, RoundingMode};
//!
//! let matrix = DpqOutcomeMatrix::default();
//! assert_eq!(matrix.classify(2, 2), CombatOutcome::Even);
//! assert_eq!(matrix.classify(5, 1), CombatOutcome::AttackerDominant);
//!
//! assert_eq!(RoundingMode::Floor.divide(7, 2), 3);
//! assert_eq!(RoundingMode::Ceil.divide(7, 2), 4);
//! assert_eq!(RoundingMode::Nearest.divide(7, 2), 4);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How the positional matchup favours either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    /// Neither side has a positional edge.
    Even,
    /// The attacker holds the better position.
    AttackerFavored,
    /// The attacker's position is overwhelmingly better.
    AttackerDominant,
    /// The defender holds the better position.
    DefenderFavored,
    /// The defender's position is overwhelmingly better.
    DefenderDominant,
}

impl fmt::Display for CombatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "even"),
            Self::AttackerFavored => write!(f, "attacker favored"),
            Self::AttackerDominant => write!(f, "attacker dominant"),
            Self::DefenderFavored => write!(f, "defender favored"),
            Self::DefenderDominant => write!(f, "defender dominant"),
        }
    }
}

// =============================================================================
// Outcome Matrix
// =============================================================================

/// An explicit matrix cell overriding the point-difference bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    /// Attacker DPQ points.
    pub attacker_points: i32,
    /// Defender DPQ points.
    pub defender_points: i32,
    /// Outcome for this pair.
    pub outcome: CombatOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatrixRecord {
    #[serde(default = "default_favored_margin")]
    favored_margin: i32,
    #[serde(default = "default_dominant_margin")]
    dominant_margin: i32,
    #[serde(default)]
    entries: Vec<OutcomeEntry>,
}

const fn default_favored_margin() -> i32 {
    1
}

const fn default_dominant_margin() -> i32 {
    3
}

/// Lookup from a pair of DPQ point values to a [`CombatOutcome`].
///
/// Explicit entries win. Otherwise the attacker-minus-defender difference is
/// banded: at least `dominant_margin` is dominant, at least `favored_margin`
/// is favored, symmetrically for the defender, and anything in between is
/// even.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MatrixRecord", into = "MatrixRecord")]
pub struct DpqOutcomeMatrix {
    favored_margin: i32,
    dominant_margin: i32,
    entries: HashMap<(i32, i32), CombatOutcome>,
}

impl DpqOutcomeMatrix {
    /// A matrix with the given bands and no explicit entries.
    #[must_use]
    pub fn new(favored_margin: i32, dominant_margin: i32) -> Self {
        Self {
            favored_margin,
            dominant_margin,
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an explicit entry.
    #[must_use]
    pub fn with_entry(
        mut self,
        attacker_points: i32,
        defender_points: i32,
        outcome: CombatOutcome,
    ) -> Self {
        self.entries
            .insert((attacker_points, defender_points), outcome);
        self
    }

    /// Classifies the matchup.
    #[must_use]
    pub fn classify(&self, attacker_points: i32, defender_points: i32) -> CombatOutcome {
        if let Some(outcome) = self.entries.get(&(attacker_points, defender_points)) {
            return *outcome;
        }
        let difference = attacker_points - defender_points;
        if difference >= self.dominant_margin {
            CombatOutcome::AttackerDominant
        } else if difference >= self.favored_margin {
            CombatOutcome::AttackerFavored
        } else if difference <= -self.dominant_margin {
            CombatOutcome::DefenderDominant
        } else if difference <= -self.favored_margin {
            CombatOutcome::DefenderFavored
        } else {
            CombatOutcome::Even
        }
    }
}

impl Default for DpqOutcomeMatrix {
    fn default() -> Self {
        Self::new(default_favored_margin(), default_dominant_margin())
    }
}

impl From<MatrixRecord> for DpqOutcomeMatrix {
    fn from(record: MatrixRecord) -> Self {
        Self {
            favored_margin: record.favored_margin,
            dominant_margin: record.dominant_margin,
            entries: record
                .entries
                .into_iter()
                .map(|e| ((e.attacker_points, e.defender_points), e.outcome))
                .collect(),
        }
    }
}

impl From<DpqOutcomeMatrix> for MatrixRecord {
    fn from(matrix: DpqOutcomeMatrix) -> Self {
        let mut entries: Vec<OutcomeEntry> = matrix
            .entries
            .into_iter()
            .map(|((attacker_points, defender_points), outcome)| OutcomeEntry {
                attacker_points,
                defender_points,
                outcome,
            })
            .collect();
        entries.sort_by_key(|e| (e.attacker_points, e.defender_points));
        Self {
            favored_margin: matrix.favored_margin,
            dominant_margin: matrix.dominant_margin,
            entries,
        }
    }
}

// =============================================================================
// Rounding
// =============================================================================

/// Integer rounding of a non-negative quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Round toward zero.
    Floor,
    /// Round up any remainder.
    Ceil,
    /// Round to nearest, halves up.
    Nearest,
}

impl RoundingMode {
    /// Divides `numerator` by `denominator` and rounds.
    ///
    /// Negative numerators count as zero; denominators below 1 count as 1.
    #[must_use]
    pub const fn divide(self, numerator: i64, denominator: i64) -> i64 {
        let n = if numerator < 0 { 0 } else { numerator };
        let d = if denominator < 1 { 1 } else { denominator };
        let (quotient, remainder) = (n / d, n % d);
        let round_up = match self {
            Self::Floor => false,
            Self::Ceil => remainder > 0,
            Self::Nearest => remainder >= d - remainder,
        };
        if round_up {
            quotient + 1
        } else {
            quotient
        }
    }
}

/// Rounding applied to each strike of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeRounding {
    /// Rounding of the attacker's strike on the defender.
    pub strike: RoundingMode,
    /// Rounding of the defender's counter on the attacker.
    pub counter: RoundingMode,
}

impl StrikeRounding {
    /// Creates an entry.
    #[must_use]
    pub const fn new(strike: RoundingMode, counter: RoundingMode) -> Self {
        Self { strike, counter }
    }
}

/// Rounding per [`CombatOutcome`].
///
/// The side holding the positional edge has its remainders rounded up, the
/// side at a disadvantage has them dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingTable {
    /// Rounding when neither side has an edge.
    pub even: StrikeRounding,
    /// Rounding when the attacker is favored.
    pub attacker_favored: StrikeRounding,
    /// Rounding when the attacker dominates.
    pub attacker_dominant: StrikeRounding,
    /// Rounding when the defender is favored.
    pub defender_favored: StrikeRounding,
    /// Rounding when the defender dominates.
    pub defender_dominant: StrikeRounding,
}

impl RoundingTable {
    /// The entry for `outcome`.
    #[must_use]
    pub const fn for_outcome(&self, outcome: CombatOutcome) -> StrikeRounding {
        match outcome {
            CombatOutcome::Even => self.even,
            CombatOutcome::AttackerFavored => self.attacker_favored,
            CombatOutcome::AttackerDominant => self.attacker_dominant,
            CombatOutcome::DefenderFavored => self.defender_favored,
            CombatOutcome::DefenderDominant => self.defender_dominant,
        }
    }
}

impl Default for RoundingTable {
    fn default() -> Self {
        use RoundingMode::{Ceil, Floor, Nearest};
        Self {
            even: StrikeRounding::new(Nearest, Nearest),
            attacker_favored: StrikeRounding::new(Nearest, Floor),
            attacker_dominant: StrikeRounding::new(Ceil, Floor),
            defender_favored: StrikeRounding::new(Floor, Nearest),
            defender_dominant: StrikeRounding::new(Floor, Ceil),
        }
    }
}

//! Resolvers apply an accepted decision to the board.
//!
//! Sensors propose, resolvers mutate. A resolver receives an option a sensor
//! produced, re-validates it against the current board and either applies it
//! whole or rejects it without side effects.
//!
//! # Invariants
//!
//! - All lookups and computation happen before the first mutation
//! - Results depend only on the board, catalogs, configuration and option
//! - Arithmetic is integer-only, so results are identical across platforms
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: one attack and its counter
//!
//! The [`outcome`] module holds the positional matchup matrix and the
//! rounding table combat uses.

pub mod combat;
pub mod outcome;

pub use combat::{
    AbortReason, CombatReport, CombatResolver, CombatTrace, CounterStatus, SideTrace, StrikeTrace,
};
pub use outcome::{
    CombatOutcome, DpqOutcomeMatrix, OutcomeEntry, RoundingMode, RoundingTable, StrikeRounding,
};

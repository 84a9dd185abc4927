//! Scenario and property tests for the rules core.
//!
//! # Test Structure
//!
//! - `integration.rs`: full turns through the engine, from scan to
//!   resolution
//! - `properties.rs`: invariants checked with proptest
//! - `helpers.rs`: standard catalogs, boards and unit factories

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;

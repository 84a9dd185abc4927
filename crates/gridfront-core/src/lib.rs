//! # Gridfront Core
//!
//! Rules core for Gridfront, a turn-based tactical wargame on a hex board.
//!
//! This crate answers the questions a turn asks of the rules: which enemies
//! can this unit fire on, which transporters can it board, and what happens
//! when it attacks. It is deterministic and integer-only.
//!
//! ## Architecture
//!
//! - **Board**: [`Board`] holds tiles, units and the cell-to-unit index
//! - **Catalogs**: [`Catalogs`] is the immutable game data (weapons, terrain,
//!   skills, matchup bonuses, positional tiers), loaded once and shared
//! - **Sensors**: [`sensor`] scans read a [`BoardView`] and report valid and
//!   rejected options, each rejection with a reason
//! - **Resolvers**: [`resolver`] applies an accepted option to the board,
//!   all or nothing
//! - **Engine**: [`RulesEngine`] binds catalogs and configuration and exposes
//!   every entry point
//!
//! Geometry (distance fields, line sampling, sight lines) lives in the
//! `hexfield` crate.
//!
//! ## Quick Start
//!
//! ```
//! use gridfront_core::{Board, CatalogData, Catalogs, RulesEngine};
//! use gridfront_core::catalog::{WeaponCategory, WeaponProfile};
//! use gridfront_core::layer::Layer;
//! use gridfront_core::sensor::MovementMode;
//! use gridfront_core::unit::{EmbarkedWeapon, Team, UnitClass, UnitSpec};
//! use hexfield::HexCell;
//!
//! let howitzer = WeaponProfile::new("howitzer", WeaponCategory::Artillery, 4).with_range(2, 4);
//! let mut data = CatalogData::default();
//! data.weapons.push(howitzer.clone());
//! let engine = RulesEngine::new(Catalogs::build(data).unwrap());
//!
//! let mut board = Board::new(10, 10);
//! let battery = board
//!     .spawn(
//!         UnitSpec::new(Team::new(1), UnitClass::Artillery, Layer::Land, HexCell::new(2, 2))
//!             .with_weapon(EmbarkedWeapon::from_profile(&howitzer).unwrap()),
//!     )
//!     .unwrap();
//! let enemy = board
//!     .spawn(UnitSpec::new(Team::new(2), UnitClass::Armor, Layer::Land, HexCell::new(2, 5)))
//!     .unwrap();
//!
//! let report = engine.collect_targets(&board, battery, MovementMode::Stationary);
//! assert_eq!(report.valid.len(), 1);
//!
//! let combat = engine.resolve_combat(&mut board, &report.valid[0]);
//! assert!(combat.success());
//! assert!(board.unit(enemy).unwrap().combat.hp < 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod layer;
pub mod resolver;
pub mod sensor;
pub mod unit;
pub mod view;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use board::{Board, Tile};
pub use catalog::{CatalogData, Catalogs};
pub use config::RulesConfig;
pub use engine::RulesEngine;
pub use error::{Result, RulesError};
pub use layer::{Layer, LayerMask};
pub use resolver::{CombatReport, CombatResolver};
pub use sensor::{EmbarkationSensor, LineOfFireResolver, TargetingSensor};
pub use unit::{Unit, UnitId};
pub use view::BoardView;

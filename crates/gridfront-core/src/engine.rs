//! The rules engine: one entry point for every rules query and mutation.
//!
//! `RulesEngine` owns the shared catalogs and the configuration. The board
//! is passed in per call, so one engine serves any number of boards and the
//! borrow checker keeps reads and writes apart: sensors take `&Board`,
//! resolution takes `&mut Board`.
//!
//! # Example
//!
//! ```
//! use gridfront_core::board::Board;
//! use gridfront_core::catalog::{CatalogData, Catalogs, WeaponCategory, WeaponProfile};
//! use gridfront_core::engine::RulesEngine;
//! use gridfront_core::layer::Layer;
//! use gridfront_core::sensor::MovementMode;
//! use gridfront_core::unit::{EmbarkedWeapon, Team, UnitClass, UnitSpec};
//! use hexfield::HexCell;
//!
//! let rifle = WeaponProfile::new("rifle", WeaponCategory::SmallArms, 3);
//! let mut data = CatalogData::default();
//! data.weapons.push(rifle.clone());
//! let engine = RulesEngine::new(Catalogs::build(data).unwrap());
//!
//! let mut board = Board::new(6, 6);
//! let squad = board
//!     .spawn(
//!         UnitSpec::new(Team::new(1), UnitClass::Infantry, Layer::Land, HexCell::new(1, 1))
//!             .with_weapon(EmbarkedWeapon::from_profile(&rifle).unwrap()),
//!     )
//!     .unwrap();
//! board
//!     .spawn(UnitSpec::new(Team::new(2), UnitClass::Infantry, Layer::Land, HexCell::new(1, 2)))
//!     .unwrap();
//!
//! let targets = engine.collect_targets(&board, squad, MovementMode::Stationary);
//! let report = engine.resolve_combat(&mut board, &targets.valid[0]);
//! assert!(report.success());
//! ```

use std::sync::Arc;

use crate::board::Board;
use crate::catalog::Catalogs;
use crate::config::RulesConfig;
use crate::error::Result;
use crate::resolver::{CombatReport, CombatResolver};
use crate::sensor::{
    DetectionModel, EmbarkReport, EmbarkationSensor, MovementMode, TargetOption, TargetReport,
    TargetingSensor,
};
use crate::unit::UnitId;
use crate::view::BoardView;

/// Catalogs and configuration bound together.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    catalogs: Arc<Catalogs>,
    config: RulesConfig,
}

impl RulesEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(catalogs: impl Into<Arc<Catalogs>>) -> Self {
        Self::with_config(catalogs, RulesConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(catalogs: impl Into<Arc<Catalogs>>, config: RulesConfig) -> Self {
        Self {
            catalogs: catalogs.into(),
            config,
        }
    }

    /// The shared catalogs.
    #[must_use]
    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// A read-only view of `board` under these rules.
    #[must_use]
    pub fn view<'a>(&'a self, board: &'a Board) -> BoardView<'a> {
        BoardView::new(board, &self.catalogs, &self.config)
    }

    /// Engagement options for `attacker`, every enemy detected.
    #[must_use]
    pub fn collect_targets(
        &self,
        board: &Board,
        attacker: UnitId,
        mode: MovementMode,
    ) -> TargetReport {
        TargetingSensor::new().collect(&self.view(board), attacker, mode)
    }

    /// Engagement options for `attacker` under a custom detection model.
    #[must_use]
    pub fn collect_targets_with(
        &self,
        detection: &dyn DetectionModel,
        board: &Board,
        attacker: UnitId,
        mode: MovementMode,
    ) -> TargetReport {
        TargetingSensor::with_detection(detection).collect(&self.view(board), attacker, mode)
    }

    /// Boarding options for `unit` with `remaining_movement` left.
    #[must_use]
    pub fn collect_embark_options(
        &self,
        board: &Board,
        unit: UnitId,
        remaining_movement: u32,
    ) -> EmbarkReport {
        EmbarkationSensor::new().collect(&self.view(board), unit, remaining_movement)
    }

    /// Resolves an engagement option.
    pub fn resolve_combat(&self, board: &mut Board, option: &TargetOption) -> CombatReport {
        CombatResolver::new(&self.catalogs, &self.config).resolve(board, option)
    }

    /// Spends `amount` rounds of a unit's weapon and returns what is left.
    ///
    /// # Errors
    ///
    /// See [`Board::consume_ammo`].
    pub fn consume_ammo(
        &self,
        board: &mut Board,
        unit: UnitId,
        weapon_index: usize,
        amount: u32,
    ) -> Result<u32> {
        board.consume_ammo(unit, weapon_index, amount)
    }

    /// Sets a unit's HP, clamped to its maximum, and returns the applied value.
    ///
    /// # Errors
    ///
    /// See [`Board::set_hp`].
    pub fn set_hp(&self, board: &mut Board, unit: UnitId, value: u32) -> Result<u32> {
        board.set_hp(unit, value)
    }
}

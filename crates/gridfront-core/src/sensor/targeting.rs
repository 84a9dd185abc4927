//! Targeting sensor.
//!
//! Given an attacking unit, the sensor enumerates every (enemy, weapon) pair
//! within reach and sorts them into engagement options and rejections.
//!
//! # Algorithm
//!
//! 1. Each mounted weapon becomes a range candidate. After moving with
//!    movement left ([`MovementMode::MovedStillMobile`]) only weapons whose
//!    native minimum range is 1 qualify, and their bracket shrinks to
//!    exactly 1. Empty weapons stay candidates so they can be reported as
//!    out of ammunition rather than out of range.
//! 2. One [`DistanceField`] bounded by the largest candidate range is built
//!    and shared by all weapons.
//! 3. Every active enemy on a cell in the field is checked against every
//!    candidate: range, ammunition, layer, line of fire, detection.
//! 4. Accepted pairs at distance 1 get a counter-attack assessment.
//! 5. Options against the same target are ordered preferred first, then by
//!    weapon index; targets keep their discovery order. Labels count from 1.
//!
//! # Example
//!
//! ```
//! use gridfront_core::board::Board;
//! use gridfront_core::catalog::{CatalogData, Catalogs, WeaponCategory, WeaponProfile};
//! use gridfront_core::config::RulesConfig;
//! use gridfront_core::layer::Layer;
//! use gridfront_core::sensor::{MovementMode, TargetingSensor};
//! use gridfront_core::unit::{EmbarkedWeapon, Team, UnitClass, UnitSpec};
//! use gridfront_core::view::BoardView;
//! use hexfield::HexCell;
//!
//! let cannon = WeaponProfile::new("cannon", WeaponCategory::Cannon, 5).with_range(1, 2);
//! let mut data = CatalogData::default();
//! data.weapons.push(cannon.clone());
//! let catalogs = Catalogs::build(data).unwrap();
//! let config = RulesConfig::default();
//!
//! let mut board = Board::new(8, 8);
//! let tank = board
//!     .spawn(
//!         UnitSpec::new(Team::new(1), UnitClass::Armor, Layer::Land, HexCell::new(2, 2))
//!             .with_weapon(EmbarkedWeapon::from_profile(&cannon).unwrap()),
//!     )
//!     .unwrap();
//! let enemy = board
//!     .spawn(UnitSpec::new(Team::new(2), UnitClass::Infantry, Layer::Land, HexCell::new(2, 4)))
//!     .unwrap();
//!
//! let view = BoardView::new(&board, &catalogs, &config);
//! let report = TargetingSensor::new().collect(&view, tank, MovementMode::Stationary);
//! assert_eq!(report.valid.len(), 1);
//! assert_eq!(report.valid[0].target, enemy);
//! assert_eq!(report.valid[0].distance, 2);
//! assert_eq!(report.valid[0].label, 1);
//! ```

use std::collections::HashMap;

use hexfield::{DistanceField, HexCell};
use serde::{Deserialize, Serialize};

use super::{AlwaysDetect, DetectionModel, LineOfFireResolver, NoCounterReason, RejectReason};
use crate::catalog::{WeaponId, WeaponProfile};
use crate::unit::{EmbarkedWeapon, Unit, UnitId};
use crate::view::BoardView;

/// How the attacker moved this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    /// Has not moved, or has used all its movement.
    #[default]
    Stationary,
    /// Moved and still has movement left: fire while advancing.
    MovedStillMobile,
}

/// Whether the defender of an option can strike back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAssessment {
    /// The defender counters with this weapon.
    Available {
        /// Embark index of the counter weapon.
        weapon_index: usize,
        /// Catalog id of the counter weapon.
        weapon: WeaponId,
    },
    /// The defender cannot counter.
    Unavailable(NoCounterReason),
}

impl CounterAssessment {
    /// Returns `true` if a counter weapon was selected.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Embark index of the counter weapon, if any.
    #[must_use]
    pub const fn weapon_index(&self) -> Option<usize> {
        match self {
            Self::Available { weapon_index, .. } => Some(*weapon_index),
            Self::Unavailable(_) => None,
        }
    }
}

/// A valid engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOption {
    /// The firing unit.
    pub attacker: UnitId,
    /// The unit fired upon.
    pub target: UnitId,
    /// Embark index of the weapon.
    pub weapon_index: usize,
    /// Catalog id of the weapon.
    pub weapon: WeaponId,
    /// Hex distance between the two.
    pub distance: u32,
    /// Counter-attack assessment.
    pub counter: CounterAssessment,
    /// Intermediate cells of the line of fire.
    pub line_of_fire: Vec<HexCell>,
    /// The target is a preferred target of the weapon.
    pub preferred: bool,
    /// Position in which the sensor found the option.
    pub order: usize,
    /// 1-based display label after sorting.
    pub label: usize,
}

/// A discarded (target, weapon) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRejection {
    /// The firing unit.
    pub attacker: UnitId,
    /// The unit that could not be engaged.
    pub target: UnitId,
    /// Embark index of the weapon.
    pub weapon_index: usize,
    /// Hex distance between the two.
    pub distance: u32,
    /// Why.
    pub reason: RejectReason,
}

/// Output of one targeting scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Engagement options, sorted and labelled.
    pub valid: Vec<TargetOption>,
    /// Discarded pairs in discovery order.
    pub rejected: Vec<TargetRejection>,
}

impl TargetReport {
    /// Returns `true` if the scan found nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.rejected.is_empty()
    }

    /// The option carrying display label `label`.
    #[must_use]
    pub fn by_label(&self, label: usize) -> Option<&TargetOption> {
        self.valid.iter().find(|o| o.label == label)
    }

    /// Options against `target`, in sorted order.
    pub fn against(&self, target: UnitId) -> impl Iterator<Item = &TargetOption> {
        self.valid.iter().filter(move |o| o.target == target)
    }
}

struct RangeCandidate<'a> {
    index: usize,
    weapon: &'a EmbarkedWeapon,
    profile: &'a WeaponProfile,
    min: u32,
    max: u32,
}

/// Enumerates engagement options for an attacker.
pub struct TargetingSensor<'d> {
    detection: &'d dyn DetectionModel,
}

impl TargetingSensor<'static> {
    /// A sensor that detects every enemy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            detection: &AlwaysDetect,
        }
    }
}

impl Default for TargetingSensor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> TargetingSensor<'d> {
    /// A sensor consulting `detection` before accepting a target.
    #[must_use]
    pub fn with_detection(detection: &'d dyn DetectionModel) -> Self {
        Self { detection }
    }

    /// Scans for targets of `attacker`.
    ///
    /// Returns an empty report if the attacker is unknown, inactive or
    /// embarked.
    #[must_use]
    pub fn collect(&self, view: &BoardView<'_>, attacker: UnitId, mode: MovementMode) -> TargetReport {
        let board = view.board();
        let Some(unit) = board.unit(attacker) else {
            tracing::warn!(?attacker, "targeting scan for unknown unit");
            return TargetReport::default();
        };
        if !unit.is_active() || unit.is_embarked() {
            tracing::warn!(?attacker, "targeting scan for a unit that cannot fire");
            return TargetReport::default();
        }

        let candidates = Self::range_candidates(view, unit, mode);
        let Some(radius) = candidates.iter().map(|c| c.max).max() else {
            tracing::debug!(?attacker, ?mode, "no weapon can fire");
            return TargetReport::default();
        };
        let field = DistanceField::compute(unit.cell, radius, board);
        let line_of_fire = LineOfFireResolver::new(*view);

        let mut report = TargetReport::default();
        for (cell, distance) in field.iter() {
            let Some(target) = board.occupant_unit(cell) else {
                continue;
            };
            if target.is_allied_with(unit) || !target.is_active() {
                continue;
            }

            for candidate in &candidates {
                let reject = |reason| TargetRejection {
                    attacker,
                    target: target.id(),
                    weapon_index: candidate.index,
                    distance,
                    reason,
                };

                if distance < candidate.min || distance > candidate.max {
                    report.rejected.push(reject(RejectReason::OutOfRange {
                        distance,
                        min: candidate.min,
                        max: candidate.max,
                    }));
                    continue;
                }
                if !candidate.weapon.has_ammo() {
                    report.rejected.push(reject(RejectReason::NoAmmunition));
                    continue;
                }
                if !candidate.profile.can_engage(target.layer) {
                    report.rejected.push(reject(RejectReason::LayerIncompatible));
                    continue;
                }
                let line = line_of_fire.between(
                    unit,
                    target,
                    candidate.profile,
                    candidate.weapon.trajectory,
                );
                if let Some((cell, cause)) = line.blocked_at {
                    report
                        .rejected
                        .push(reject(RejectReason::LineOfFireBlocked { cell, cause }));
                    continue;
                }
                if !self.detection.detects(view, unit, target) {
                    report.rejected.push(reject(RejectReason::NotDetected));
                    continue;
                }

                let counter = assess_counter(view, unit, target, distance);
                tracing::trace!(
                    target = ?target.id(),
                    weapon = candidate.index,
                    distance,
                    counter = counter.is_available(),
                    "target accepted"
                );
                report.valid.push(TargetOption {
                    attacker,
                    target: target.id(),
                    weapon_index: candidate.index,
                    weapon: candidate.weapon.weapon.clone(),
                    distance,
                    counter,
                    line_of_fire: line.cells,
                    preferred: view
                        .catalogs()
                        .is_preferred_target(candidate.profile.category, target.class),
                    order: report.valid.len(),
                    label: 0,
                });
            }
        }

        rank(&mut report.valid);
        tracing::debug!(
            ?attacker,
            ?mode,
            valid = report.valid.len(),
            rejected = report.rejected.len(),
            "targets collected"
        );
        report
    }

    fn range_candidates<'a>(
        view: &BoardView<'a>,
        unit: &'a Unit,
        mode: MovementMode,
    ) -> Vec<RangeCandidate<'a>> {
        let mut candidates = Vec::with_capacity(unit.weapons.len());
        for (index, weapon) in unit.weapons.iter().enumerate() {
            let profile = match view.catalogs().weapon(&weapon.weapon) {
                Ok(profile) => profile,
                Err(err) => {
                    tracing::warn!(unit = ?unit.id(), index, %err, "skipping weapon");
                    continue;
                }
            };
            let (min, max) = match mode {
                MovementMode::Stationary => (weapon.min_range, weapon.max_range),
                MovementMode::MovedStillMobile if profile.min_range == 1 => (1, 1),
                MovementMode::MovedStillMobile => {
                    tracing::trace!(unit = ?unit.id(), index, "weapon cannot fire on the move");
                    continue;
                }
            };
            candidates.push(RangeCandidate {
                index,
                weapon,
                profile,
                min,
                max,
            });
        }
        candidates
    }
}

/// Picks the defender's counter weapon against `attacker`.
///
/// The first weapon by embark index with minimum range 1, ammunition and a
/// target mask admitting the attacker's layer wins. Otherwise the reason
/// names the furthest check any weapon reached.
pub(crate) fn assess_counter(
    view: &BoardView<'_>,
    attacker: &Unit,
    defender: &Unit,
    distance: u32,
) -> CounterAssessment {
    if distance != 1 {
        return CounterAssessment::Unavailable(NoCounterReason::DistanceNotOne);
    }

    let mut furthest = NoCounterReason::NoShortRangeWeapon;
    for (index, weapon) in defender.weapons.iter().enumerate() {
        if weapon.min_range != 1 {
            continue;
        }
        if !weapon.has_ammo() {
            if furthest == NoCounterReason::NoShortRangeWeapon {
                furthest = NoCounterReason::NoAmmunition;
            }
            continue;
        }
        let Ok(profile) = view.catalogs().weapon(&weapon.weapon) else {
            continue;
        };
        if !profile.can_engage(attacker.layer) {
            furthest = NoCounterReason::LayerIncompatible;
            continue;
        }
        return CounterAssessment::Available {
            weapon_index: index,
            weapon: weapon.weapon.clone(),
        };
    }
    CounterAssessment::Unavailable(furthest)
}

fn rank(options: &mut [TargetOption]) {
    let mut first_seen: HashMap<UnitId, usize> = HashMap::new();
    for option in options.iter() {
        first_seen.entry(option.target).or_insert(option.order);
    }
    options.sort_by_key(|o| {
        (
            first_seen.get(&o.target).copied().unwrap_or(o.order),
            !o.preferred,
            o.weapon_index,
        )
    });
    for (i, option) in options.iter_mut().enumerate() {
        option.label = i + 1;
    }
}

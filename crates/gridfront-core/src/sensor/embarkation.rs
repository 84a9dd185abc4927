//! Embarkation sensor.
//!
//! Lists the transporters and slots a unit may board from where it stands.
//! Only the six neighbouring cells are considered. A transporter qualifies if
//! it is allied, not flying, has slots, and its cell lets the passenger's
//! layer board. Each slot is then checked for layer, class and skill
//! filters, the entry cost against the passenger's remaining movement, and
//! free capacity.
//!
//! # Entry cost
//!
//! Boarding costs what stepping onto the transporter's cell normally costs
//! the passenger's domain. If the passenger could never step there (a land
//! unit next to a ship at sea) the terrain's autonomy cost applies instead,
//! lowered by any skill override the passenger holds, provided it holds the
//! terrain's fallback skill.

use hexfield::{HexCell, Topology};
use serde::{Deserialize, Serialize};

use super::RejectReason;
use crate::unit::{Unit, UnitId};
use crate::view::BoardView;

/// Entry cost of a cell without terrain.
const OPEN_GROUND_COST: u32 = 1;

/// A slot the unit may board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbarkOption {
    /// The boarding unit.
    pub passenger: UnitId,
    /// The carrying unit.
    pub transporter: UnitId,
    /// Slot index on the transporter.
    pub slot: usize,
    /// Movement spent to board.
    pub cost: u32,
    /// Movement the passenger had before boarding.
    pub remaining_movement: u32,
}

/// A transporter or slot the unit may not board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbarkRejection {
    /// The boarding unit.
    pub passenger: UnitId,
    /// The rejected transporter.
    pub transporter: UnitId,
    /// The rejected slot, or `None` when the whole transporter is rejected.
    pub slot: Option<usize>,
    /// Movement the passenger had.
    pub remaining_movement: u32,
    /// Why.
    pub reason: RejectReason,
}

/// Output of one embarkation scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbarkReport {
    /// Slots the unit may board.
    pub valid: Vec<EmbarkOption>,
    /// Transporters and slots it may not.
    pub rejected: Vec<EmbarkRejection>,
}

/// Enumerates boarding options for a unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbarkationSensor;

impl EmbarkationSensor {
    /// Creates the sensor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scans the neighbourhood of `passenger`.
    ///
    /// Returns an empty report if the passenger is unknown, inactive or
    /// already embarked.
    #[must_use]
    pub fn collect(
        &self,
        view: &BoardView<'_>,
        passenger: UnitId,
        remaining_movement: u32,
    ) -> EmbarkReport {
        let board = view.board();
        let Some(unit) = board.unit(passenger) else {
            tracing::warn!(?passenger, "embarkation scan for unknown unit");
            return EmbarkReport::default();
        };
        if !unit.is_active() || unit.is_embarked() {
            tracing::warn!(?passenger, "embarkation scan for a unit that cannot board");
            return EmbarkReport::default();
        }

        let mut report = EmbarkReport::default();
        for cell in unit.cell.neighbors() {
            if !board.contains(cell) {
                continue;
            }
            let Some(transporter) = board.occupant_unit(cell) else {
                continue;
            };
            if !transporter.is_active() {
                continue;
            }
            let reject = |slot, reason| EmbarkRejection {
                passenger,
                transporter: transporter.id(),
                slot,
                remaining_movement,
                reason,
            };

            if !transporter.is_allied_with(unit) {
                report.rejected.push(reject(None, RejectReason::NotAllied));
                continue;
            }
            if transporter.layer.is_airborne() {
                report
                    .rejected
                    .push(reject(None, RejectReason::TransporterAirborne));
                continue;
            }
            let Some(bay) = transporter.transport.as_ref().filter(|_| transporter.is_transporter())
            else {
                report
                    .rejected
                    .push(reject(None, RejectReason::NoTransportCapability));
                continue;
            };
            if !view.embark_allowed(cell, unit.layer) {
                report
                    .rejected
                    .push(reject(None, RejectReason::IncompatibleContext));
                continue;
            }

            let cost = entry_cost(view, unit, cell);
            for (index, slot) in bay.slots.iter().enumerate() {
                let reason = if !slot.layers.admits(unit.layer) {
                    Some(RejectReason::LayerIncompatible)
                } else if !slot.admits_class(unit.class) {
                    Some(RejectReason::ClassNotAllowed)
                } else if let Some(skill) =
                    slot.required_skills.iter().find(|s| !unit.has_skill(s))
                {
                    Some(RejectReason::MissingRequiredSkill(skill.clone()))
                } else if let Some(skill) = slot.blocked_skills.iter().find(|s| unit.has_skill(s)) {
                    Some(RejectReason::BlockedSkill(skill.clone()))
                } else {
                    match &cost {
                        Err(reason) => Some(reason.clone()),
                        Ok(cost) if remaining_movement < *cost => {
                            Some(RejectReason::InsufficientMovement {
                                required: *cost,
                                available: remaining_movement,
                            })
                        }
                        Ok(_) if board.count_occupants(cell, slot) >= slot.capacity => {
                            Some(RejectReason::SlotFull {
                                capacity: slot.capacity,
                            })
                        }
                        Ok(_) => None,
                    }
                };

                match reason {
                    Some(reason) => {
                        tracing::trace!(transporter = ?transporter.id(), slot = index, %reason, "slot rejected");
                        report.rejected.push(reject(Some(index), reason));
                    }
                    None => report.valid.push(EmbarkOption {
                        passenger,
                        transporter: transporter.id(),
                        slot: index,
                        cost: cost.as_ref().map_or(0, |c| *c),
                        remaining_movement,
                    }),
                }
            }
        }

        tracing::debug!(
            ?passenger,
            remaining_movement,
            valid = report.valid.len(),
            rejected = report.rejected.len(),
            "embark options collected"
        );
        report
    }
}

/// Movement `passenger` spends to board a transporter on `cell`.
fn entry_cost(view: &BoardView<'_>, passenger: &Unit, cell: HexCell) -> Result<u32, RejectReason> {
    let Some(terrain) = view.site(cell).terrain() else {
        return Ok(OPEN_GROUND_COST);
    };
    if let Some(cost) = terrain.movement_cost(passenger.layer.domain()) {
        return Ok(cost);
    }
    if let Some(skill) = &terrain.fallback_skill {
        if !passenger.has_skill(skill) {
            return Err(RejectReason::MissingRequiredSkill(skill.clone()));
        }
    }
    Ok(view.catalogs().autonomy_cost(terrain, &passenger.skills))
}

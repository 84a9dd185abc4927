//! Line of fire between two units.
//!
//! Straight-trajectory weapons trace a sight line through every intermediate
//! cell: terrain the projectile cannot cross blocks outright, and cells
//! standing above the blended line height block unless the target out-sees
//! them by the configured margin. Parabolic weapons skip the path. Both need
//! the destination cell to let the projectile in.

use hexfield::{intermediate_cells, trace_sight, BlockCause, HexCell, Occluder, SightLine};

use crate::catalog::{Trajectory, WeaponProfile};
use crate::unit::Unit;
use crate::view::BoardView;

/// Decides whether a shot reaches its target.
#[derive(Debug, Clone, Copy)]
pub struct LineOfFireResolver<'a> {
    view: BoardView<'a>,
}

impl<'a> LineOfFireResolver<'a> {
    /// Creates a resolver over `view`.
    #[must_use]
    pub const fn new(view: BoardView<'a>) -> Self {
        Self { view }
    }

    /// Traces a shot between two cells with explicit endpoint visions.
    #[must_use]
    pub fn resolve(
        &self,
        origin: HexCell,
        target: HexCell,
        origin_vision: i32,
        target_vision: i32,
        weapon: &WeaponProfile,
        trajectory: Trajectory,
    ) -> SightLine {
        let travel = weapon.travel_layer;
        let mut line = match trajectory {
            Trajectory::Parabolic => SightLine {
                cells: intermediate_cells(origin, target),
                blocked_at: None,
            },
            Trajectory::Straight => trace_sight(
                origin,
                target,
                origin_vision,
                target_vision,
                self.view.config().sight,
                |cell| {
                    if self.view.fire_passable(cell, travel) {
                        Occluder::open(self.view.cell_vision(cell))
                    } else {
                        Occluder::wall()
                    }
                },
            ),
        };

        if line.blocked_at.is_none() && !self.view.fire_passable(target, travel) {
            line.blocked_at = Some((target, BlockCause::Impassable));
        }
        if let Some((cell, cause)) = line.blocked_at {
            tracing::trace!(%origin, %target, %cell, ?cause, "line of fire blocked");
        }
        line
    }

    /// Traces a shot from `attacker` to `target` using their effective cells
    /// and visions.
    #[must_use]
    pub fn between(
        &self,
        attacker: &Unit,
        target: &Unit,
        weapon: &WeaponProfile,
        trajectory: Trajectory,
    ) -> SightLine {
        let board = self.view.board();
        let origin = board.effective_cell(attacker.id()).unwrap_or(attacker.cell);
        let destination = board.effective_cell(target.id()).unwrap_or(target.cell);
        self.resolve(
            origin,
            destination,
            self.view.unit_vision(attacker),
            self.view.unit_vision(target),
            weapon,
            trajectory,
        )
    }
}

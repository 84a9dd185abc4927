//! The hex board: tiles, units and the cell-to-unit index.
//!
//! The board is the container for all match state the rules read and write.
//! It provides:
//! - Tile storage (terrain plus optional structure and construction)
//! - Unit storage with deterministic iteration order (`BTreeMap`)
//! - A cell-to-unit index for O(1) occupant queries
//! - The mutation entry points for HP, ammunition, movement and embarkation
//!
//! # Architecture
//!
//! Unit ids are assigned monotonically and units are stored in a `BTreeMap`,
//! so iteration order is stable across runs. The occupancy index holds every
//! unit standing on a cell in its own right; embarked units are not indexed
//! and report their transporter's cell through [`Board::effective_cell`].
//!
//! Callers only ever get shared references to units. HP and ammunition
//! change through [`Board::set_hp`] and [`Board::consume_ammo`], both of
//! which keep the values inside `[0, max]`.
//!
//! # Example
//!
//! ```
//! use gridfront_core::board::{Board, Tile};
//! use gridfront_core::catalog::TerrainId;
//! use gridfront_core::layer::Layer;
//! use gridfront_core::unit::{Team, UnitClass, UnitSpec};
//! use hexfield::HexCell;
//!
//! let mut board = Board::new(10, 10);
//! board.fill(&TerrainId::new("plains"));
//!
//! let id = board
//!     .spawn(UnitSpec::new(Team::new(1), UnitClass::Armor, Layer::Land, HexCell::new(4, 4)))
//!     .unwrap();
//! assert_eq!(board.occupant(HexCell::new(4, 4)), Some(id));
//!
//! board.move_unit(id, HexCell::new(5, 4)).unwrap();
//! assert_eq!(board.occupant(HexCell::new(4, 4)), None);
//! assert_eq!(board.effective_cell(id), Some(HexCell::new(5, 4)));
//! ```

use std::collections::{BTreeMap, HashMap};

use hexfield::{HexCell, RectBounds, Topology};
use serde::{Deserialize, Serialize};

use crate::catalog::{ConstructionId, StructureId, TerrainId};
use crate::error::{Result, RulesError};
use crate::sensor::EmbarkOption;
use crate::unit::{Embarkment, TransportSlot, Unit, UnitFlags, UnitId, UnitSpec};

// =============================================================================
// Tile
// =============================================================================

/// What stands on one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain type.
    pub terrain: TerrainId,
    /// Structure on the terrain, if any.
    #[serde(default)]
    pub structure: Option<StructureId>,
    /// Construction on the terrain, if any.
    #[serde(default)]
    pub construction: Option<ConstructionId>,
}

impl Tile {
    /// A bare terrain tile.
    #[must_use]
    pub fn new(terrain: impl Into<TerrainId>) -> Self {
        Self {
            terrain: terrain.into(),
            structure: None,
            construction: None,
        }
    }

    /// Places a structure.
    #[must_use]
    pub fn with_structure(mut self, structure: impl Into<StructureId>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    /// Places a construction.
    #[must_use]
    pub fn with_construction(mut self, construction: impl Into<ConstructionId>) -> Self {
        self.construction = Some(construction.into());
        self
    }
}

// =============================================================================
// Board
// =============================================================================

/// Tiles and units of a match.
#[derive(Debug, Clone)]
pub struct Board {
    bounds: RectBounds,
    tiles: HashMap<HexCell, Tile>,
    units: BTreeMap<UnitId, Unit>,
    /// Units standing on a cell in their own right.
    occupancy: HashMap<HexCell, UnitId>,
    next_id: u64,
}

impl Board {
    /// Creates an empty `columns × rows` board with no tiles.
    #[must_use]
    pub fn new(columns: i32, rows: i32) -> Self {
        Self {
            bounds: RectBounds::new(columns, rows),
            tiles: HashMap::new(),
            units: BTreeMap::new(),
            occupancy: HashMap::new(),
            next_id: 0,
        }
    }

    /// The board dimensions.
    #[must_use]
    pub const fn bounds(&self) -> RectBounds {
        self.bounds
    }

    // -------------------------------------------------------------------------
    // Tiles
    // -------------------------------------------------------------------------

    /// Places a tile.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CellOutOfBounds`] for cells off the board.
    pub fn set_tile(&mut self, cell: HexCell, tile: Tile) -> Result<()> {
        if !self.contains(cell) {
            return Err(RulesError::CellOutOfBounds(cell));
        }
        self.tiles.insert(cell, tile);
        Ok(())
    }

    /// Covers every cell of the board with bare `terrain`.
    pub fn fill(&mut self, terrain: &TerrainId) {
        for column in 0..self.bounds.columns {
            for row in 0..self.bounds.rows {
                self.tiles
                    .insert(HexCell::new(column, row), Tile::new(terrain.clone()));
            }
        }
    }

    /// The tile at `cell`, if one was placed.
    #[must_use]
    pub fn tile(&self, cell: HexCell) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    // -------------------------------------------------------------------------
    // Units
    // -------------------------------------------------------------------------

    /// Places a new unit and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CellOutOfBounds`] or
    /// [`RulesError::CellOccupied`] if the unit cannot stand on its cell.
    pub fn spawn(&mut self, spec: UnitSpec) -> Result<UnitId> {
        self.check_free(spec.cell, None)?;
        let id = UnitId::new(self.next_id);
        self.next_id += 1;

        let cell = spec.cell;
        self.units.insert(id, Unit::from_spec(id, spec));
        self.occupancy.insert(cell, id);
        tracing::trace!(?id, %cell, "unit spawned");
        Ok(id)
    }

    /// Removes a unit and everything it carries.
    pub fn despawn(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        if unit.is_embarked() {
            return Some(unit);
        }
        self.occupancy.remove(&unit.cell);

        let passengers: Vec<UnitId> = self.passengers(id).map(Unit::id).collect();
        for passenger in passengers {
            self.units.remove(&passenger);
        }
        tracing::debug!(?id, "unit despawned");
        Some(unit)
    }

    /// Looks up a unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.units.get_mut(&id).ok_or(RulesError::UnitNotFound(id))
    }

    fn require(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id).ok_or(RulesError::UnitNotFound(id))
    }

    /// All units in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Number of units on the board, embarked ones included.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// The unit standing on `cell` in its own right.
    #[must_use]
    pub fn occupant(&self, cell: HexCell) -> Option<UnitId> {
        self.occupancy.get(&cell).copied()
    }

    /// The unit standing on `cell`, resolved.
    #[must_use]
    pub fn occupant_unit(&self, cell: HexCell) -> Option<&Unit> {
        self.occupant(cell).and_then(|id| self.unit(id))
    }

    /// Where the unit is: its own cell, or its transporter's when embarked.
    #[must_use]
    pub fn effective_cell(&self, id: UnitId) -> Option<HexCell> {
        let unit = self.unit(id)?;
        match unit.embarked {
            Some(embarkment) => self.unit(embarkment.transporter).map(|t| t.cell),
            None => Some(unit.cell),
        }
    }

    /// Units carried by `transporter`.
    pub fn passengers(&self, transporter: UnitId) -> impl Iterator<Item = &Unit> {
        self.units
            .values()
            .filter(move |u| u.embarked.is_some_and(|e| e.transporter == transporter))
    }

    /// Current occupancy of a transport slot.
    ///
    /// Counts embarked units located on the transporter's cell whose class
    /// passes the slot's class filter.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnitNotFound`] for unknown transporters and
    /// [`RulesError::InvalidEmbarkation`] if the slot does not exist.
    pub fn slot_occupancy(&self, transporter: UnitId, slot: usize) -> Result<u32> {
        let slot = self.slot(transporter, slot)?;
        Ok(self
            .effective_cell(transporter)
            .map_or(0, |cell| self.count_occupants(cell, slot)))
    }

    /// Occupancy of `slot` for a transporter standing on `cell`.
    pub(crate) fn count_occupants(&self, cell: HexCell, slot: &TransportSlot) -> u32 {
        let count = self
            .units
            .values()
            .filter(|u| u.is_embarked())
            .filter(|u| self.effective_cell(u.id()) == Some(cell))
            .filter(|u| slot.admits_class(u.class))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn slot(&self, transporter: UnitId, slot: usize) -> Result<&TransportSlot> {
        self.require(transporter)?
            .transport
            .as_ref()
            .and_then(|bay| bay.slots.get(slot))
            .ok_or_else(|| {
                RulesError::InvalidEmbarkation(format!(
                    "transporter {transporter:?} has no slot {slot}"
                ))
            })
    }

    fn check_free(&self, cell: HexCell, mover: Option<UnitId>) -> Result<()> {
        if !self.contains(cell) {
            return Err(RulesError::CellOutOfBounds(cell));
        }
        match self.occupant(cell) {
            Some(occupant) if Some(occupant) != mover => {
                Err(RulesError::CellOccupied { cell, occupant })
            }
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Moves a unit standing on its own to `to`. Passengers travel along.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnitNotFound`], [`RulesError::UnitEmbarked`],
    /// [`RulesError::CellOutOfBounds`] or [`RulesError::CellOccupied`].
    pub fn move_unit(&mut self, id: UnitId, to: HexCell) -> Result<()> {
        let from = {
            let unit = self.require(id)?;
            if unit.is_embarked() {
                return Err(RulesError::UnitEmbarked(id));
            }
            unit.cell
        };
        self.check_free(to, Some(id))?;

        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        self.unit_mut(id)?.cell = to;
        for unit in self.units.values_mut() {
            if unit.embarked.is_some_and(|e| e.transporter == id) {
                unit.cell = to;
            }
        }
        tracing::trace!(?id, %from, %to, "unit moved");
        Ok(())
    }

    /// Removes `amount` rounds from a weapon and returns the rounds left.
    ///
    /// Fails without changing anything if fewer than `amount` rounds remain.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnitNotFound`],
    /// [`RulesError::WeaponIndexOutOfRange`] or
    /// [`RulesError::InsufficientAmmunition`].
    pub fn consume_ammo(&mut self, id: UnitId, weapon_index: usize, amount: u32) -> Result<u32> {
        let unit = self.unit_mut(id)?;
        let weapon = unit
            .weapons
            .get_mut(weapon_index)
            .ok_or(RulesError::WeaponIndexOutOfRange {
                unit: id,
                index: weapon_index,
            })?;
        let remaining = weapon
            .ammo
            .checked_sub(amount)
            .ok_or(RulesError::InsufficientAmmunition {
                unit: id,
                index: weapon_index,
                available: weapon.ammo,
                requested: amount,
            })?;
        weapon.ammo = remaining.min(weapon.max_ammo);
        Ok(weapon.ammo)
    }

    /// Sets a unit's HP, clamped to `[0, max_hp]`, and returns the applied
    /// value. Reaching zero marks the unit eliminated; raising it above zero
    /// clears the mark.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnitNotFound`] for unknown units.
    pub fn set_hp(&mut self, id: UnitId, value: u32) -> Result<u32> {
        let unit = self.unit_mut(id)?;
        unit.combat.hp = value.min(unit.combat.max_hp);
        if unit.combat.is_eliminated() {
            if !unit.flags.contains(UnitFlags::ELIMINATED) {
                tracing::debug!(?id, "unit eliminated");
            }
            unit.flags.insert(UnitFlags::ELIMINATED);
        } else {
            unit.flags.remove(UnitFlags::ELIMINATED);
        }
        Ok(unit.combat.hp)
    }

    /// Boards a passenger onto a transporter slot.
    ///
    /// The option is re-checked against the current board, capacity
    /// included, so a stale option cannot overfill a slot.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnitNotFound`] for unknown units,
    /// [`RulesError::SlotFull`] if the slot has no room left, and
    /// [`RulesError::InvalidEmbarkation`] if the pairing is no longer valid.
    pub fn embark(&mut self, option: &EmbarkOption) -> Result<()> {
        let passenger = self.require(option.passenger)?;
        let transporter = self.require(option.transporter)?;
        let invalid = |reason: &str| Err(RulesError::InvalidEmbarkation(reason.to_string()));

        if passenger.id() == transporter.id() {
            return invalid("a unit cannot board itself");
        }
        if passenger.is_embarked() || transporter.is_embarked() {
            return invalid("both units must stand on their own cells");
        }
        if !passenger.is_active() || !transporter.is_active() {
            return invalid("both units must be active");
        }
        if !passenger.is_allied_with(transporter) {
            return invalid("transporter is not allied");
        }
        if !passenger.cell.is_adjacent(transporter.cell) {
            return invalid("transporter is not adjacent");
        }

        let slot = self.slot(option.transporter, option.slot)?;
        if !slot.layers.admits(passenger.layer) || !slot.admits_class(passenger.class) {
            return invalid("slot does not accept the passenger");
        }
        let occupancy = self.count_occupants(transporter.cell, slot);
        if occupancy >= slot.capacity {
            return Err(RulesError::SlotFull {
                transporter: option.transporter,
                slot: option.slot,
                capacity: slot.capacity,
            });
        }

        let (from, to) = (passenger.cell, transporter.cell);
        self.occupancy.remove(&from);
        let unit = self.unit_mut(option.passenger)?;
        unit.cell = to;
        unit.embarked = Some(Embarkment {
            transporter: option.transporter,
            slot: option.slot,
        });
        tracing::debug!(
            passenger = ?option.passenger,
            transporter = ?option.transporter,
            slot = option.slot,
            "unit embarked"
        );
        Ok(())
    }

    /// Lands an embarked unit on a free cell next to its transporter.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NotEmbarked`] if the unit rides in nothing,
    /// [`RulesError::InvalidEmbarkation`] if `cell` is not adjacent to the
    /// transporter, and the errors of an ordinary move otherwise.
    pub fn disembark(&mut self, id: UnitId, cell: HexCell) -> Result<()> {
        let unit = self.require(id)?;
        let Some(embarkment) = unit.embarked else {
            return Err(RulesError::NotEmbarked(id));
        };
        let transporter_cell = self.require(embarkment.transporter)?.cell;
        if !transporter_cell.is_adjacent(cell) {
            return Err(RulesError::InvalidEmbarkation(format!(
                "{cell} is not adjacent to the transporter"
            )));
        }
        self.check_free(cell, None)?;

        let unit = self.unit_mut(id)?;
        unit.embarked = None;
        unit.cell = cell;
        self.occupancy.insert(cell, id);
        tracing::debug!(?id, %cell, "unit disembarked");
        Ok(())
    }
}

impl Topology for Board {
    fn contains(&self, cell: HexCell) -> bool {
        self.bounds.contains(cell)
    }
}

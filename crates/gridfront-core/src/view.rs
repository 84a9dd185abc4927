//! `BoardView` provides read-only access to the board joined with the
//! catalogs and configuration.
//!
//! Sensors take a [`BoardView`] and never mutate anything. The view also
//! resolves the per-cell and per-unit values several rules share: the site
//! features on a cell in priority order, effective vision, positional
//! quality and projectile passability.
//!
//! Tiles that name a terrain, structure or construction missing from the
//! catalogs are treated as if that feature were absent.

use hexfield::HexCell;

use crate::board::Board;
use crate::catalog::{Catalogs, DpqTier, SiteFeature, TerrainProfile};
use crate::config::RulesConfig;
use crate::layer::Layer;
use crate::unit::Unit;

/// The site features on one cell, construction first.
#[derive(Default)]
pub struct SiteStack<'a> {
    features: Vec<&'a dyn SiteFeature>,
    terrain: Option<&'a TerrainProfile>,
}

impl<'a> SiteStack<'a> {
    /// Features in priority order: construction, structure, terrain.
    pub fn iter(&self) -> impl Iterator<Item = &'a dyn SiteFeature> + '_ {
        self.features.iter().copied()
    }

    /// The highest-priority feature present.
    #[must_use]
    pub fn top(&self) -> Option<&'a dyn SiteFeature> {
        self.features.first().copied()
    }

    /// The highest-priority feature that applies to `layer`.
    #[must_use]
    pub fn for_layer(&self, layer: Layer) -> Option<&'a dyn SiteFeature> {
        self.iter().find(|f| f.layers().admits(layer))
    }

    /// The terrain of the cell.
    #[must_use]
    pub const fn terrain(&self) -> Option<&'a TerrainProfile> {
        self.terrain
    }
}

/// Read-only view of the board, catalogs and configuration.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    board: &'a Board,
    catalogs: &'a Catalogs,
    config: &'a RulesConfig,
}

impl<'a> BoardView<'a> {
    /// Creates a view.
    #[must_use]
    pub const fn new(board: &'a Board, catalogs: &'a Catalogs, config: &'a RulesConfig) -> Self {
        Self {
            board,
            catalogs,
            config,
        }
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &'a Board {
        self.board
    }

    /// The catalogs.
    #[must_use]
    pub const fn catalogs(&self) -> &'a Catalogs {
        self.catalogs
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &'a RulesConfig {
        self.config
    }

    /// The site features on `cell`.
    #[must_use]
    pub fn site(&self, cell: HexCell) -> SiteStack<'a> {
        let Some(tile) = self.board.tile(cell) else {
            return SiteStack::default();
        };
        let mut stack = SiteStack::default();

        if let Some(id) = &tile.construction {
            match self.catalogs.construction(id) {
                Some(construction) => stack.features.push(construction),
                None => tracing::warn!(%cell, construction = %id, "unknown construction on tile"),
            }
        }
        if let Some(id) = &tile.structure {
            match self.catalogs.structure(id) {
                Some(structure) => stack.features.push(structure),
                None => tracing::warn!(%cell, structure = %id, "unknown structure on tile"),
            }
        }
        match self.catalogs.terrain(&tile.terrain) {
            Some(terrain) => {
                stack.features.push(terrain);
                stack.terrain = Some(terrain);
            }
            None => tracing::warn!(%cell, terrain = %tile.terrain, "unknown terrain on tile"),
        }
        stack
    }

    /// Effective vision of a cell as an intermediate obstacle.
    ///
    /// With a ground occupant the first feature applying to its layer
    /// decides; otherwise the highest-priority feature present.
    #[must_use]
    pub fn cell_vision(&self, cell: HexCell) -> i32 {
        let site = self.site(cell);
        let feature = match self.board.occupant_unit(cell) {
            Some(occupant) if !occupant.layer.is_airborne() => site.for_layer(occupant.layer),
            _ => site.top(),
        };
        feature.map_or(0, |f| f.vision())
    }

    /// Effective vision of a unit as a sight-line endpoint.
    #[must_use]
    pub fn unit_vision(&self, unit: &Unit) -> i32 {
        if unit.layer.is_airborne() {
            return match self.catalogs.air_height(unit.layer) {
                Some(air) => air.vision,
                None => {
                    tracing::warn!(layer = %unit.layer, "no air-height entry");
                    0
                }
            };
        }
        let cell = self.board.effective_cell(unit.id()).unwrap_or(unit.cell);
        self.site(cell)
            .for_layer(unit.layer)
            .map_or(0, |f| f.vision())
    }

    /// Positional-quality tier of a unit.
    ///
    /// Airborne units use the air-height table. Others take the tier of the
    /// first feature on their cell that applies to their layer and carries
    /// one. Without a match the catalogs' default tier applies.
    #[must_use]
    pub fn unit_dpq(&self, unit: &Unit) -> &'a DpqTier {
        let id = if unit.layer.is_airborne() {
            self.catalogs.air_height(unit.layer).map(|air| &air.dpq)
        } else {
            let cell = self.board.effective_cell(unit.id()).unwrap_or(unit.cell);
            self.site(cell)
                .iter()
                .filter(|f| f.layers().admits(unit.layer))
                .find_map(|f| f.dpq())
        };
        id.and_then(|id| self.catalogs.dpq(id))
            .unwrap_or_else(|| self.catalogs.default_dpq())
    }

    /// Returns `true` if a projectile travelling on `layer` may cross `cell`.
    #[must_use]
    pub fn fire_passable(&self, cell: HexCell, layer: Layer) -> bool {
        if self.config.always_allow_air && layer.is_airborne() {
            return true;
        }
        self.site(cell)
            .terrain()
            .map_or(true, |terrain| terrain.fire_passable.admits(layer))
    }

    /// Returns `true` if a `layer` passenger may board a transporter on `cell`.
    ///
    /// The highest-priority feature present decides.
    #[must_use]
    pub fn embark_allowed(&self, cell: HexCell, layer: Layer) -> bool {
        self.site(cell)
            .top()
            .map_or(true, |feature| feature.embark_layers().admits(layer))
    }
}

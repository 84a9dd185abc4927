//! Test helper functions for setting up boards, catalogs and units.
//!
//! The standard catalogs describe a small but complete ruleset: ground,
//! naval and air weapons, a handful of terrains with vision and positional
//! tiers, and the amphibious boarding rule at sea.

use crate::board::{Board, Tile};
use crate::catalog::{
    AirHeightProfile, AttackRule, CatalogData, Catalogs, DpqTier, ModifierScope, ModifierStat,
    SkillId, SkillModifier, SkillProfile, StructureProfile, TerrainProfile, Trajectories,
    WeaponCategory, WeaponPriority, WeaponProfile,
};
use crate::layer::{Domain, Layer, LayerMask};
use crate::unit::{CombatState, EmbarkedWeapon, Team, TransportBay, TransportSlot, UnitClass, UnitId, UnitSpec};
use hexfield::HexCell;

/// Team of the units under test.
pub const BLUE: Team = Team::new(1);
/// Opposing team.
pub const RED: Team = Team::new(2);

/// Installs a fmt subscriber writing to the test harness. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Catalogs
// =============================================================================

/// The standard weapon set.
pub fn standard_weapons() -> Vec<WeaponProfile> {
    vec![
        WeaponProfile::new("rifle", WeaponCategory::SmallArms, 2),
        WeaponProfile::new("cannon", WeaponCategory::Cannon, 5).with_range(1, 2),
        WeaponProfile::new("howitzer", WeaponCategory::Artillery, 4)
            .with_range(2, 4)
            .with_trajectories(Trajectories::PARABOLIC)
            .with_ammo_capacity(4),
        WeaponProfile::new("flak", WeaponCategory::AntiAir, 4)
            .with_range(1, 3)
            .with_targets(LayerMask::AIR),
        WeaponProfile::new("torpedo", WeaponCategory::Torpedo, 6)
            .with_range(1, 3)
            .with_targets(LayerMask::NAVAL | LayerMask::SUBMARINE)
            .with_travel_layer(Layer::Naval),
    ]
}

/// Catalogs shared by the scenario tests.
pub fn standard_catalogs() -> Catalogs {
    let mut data = CatalogData::default();
    data.weapons = standard_weapons();
    data.dpq_tiers.extend([
        DpqTier::new("open", 0, 0),
        DpqTier::new("cover", 1, 1),
        DpqTier::new("high", 2, 2),
        DpqTier::new("fortified", 3, 3),
        DpqTier::new("sky", 1, 0),
    ]);
    data.default_dpq = Some("open".into());
    data.terrains.extend([
        TerrainProfile::new("plains").with_movement_cost(Domain::Land, 1),
        TerrainProfile::new("forest")
            .with_vision(1)
            .with_dpq("cover")
            .with_movement_cost(Domain::Land, 2),
        TerrainProfile::new("hill")
            .with_vision(2)
            .with_dpq("high")
            .with_movement_cost(Domain::Land, 2),
        TerrainProfile::new("mountain")
            .with_vision(3)
            .with_dpq("high")
            .with_movement_cost(Domain::Land, 3),
        TerrainProfile::new("sea")
            .with_layers(LayerMask::NAVAL | LayerMask::SUBMARINE)
            .with_fire_passable(LayerMask::NAVAL | LayerMask::SUBMARINE)
            .with_movement_cost(Domain::Naval, 1)
            .with_movement_cost(Domain::Submarine, 1)
            .with_autonomy(3, Some(SkillId::new("amphibious"))),
    ]);
    data.structures.push(
        StructureProfile::new("bunker")
            .with_vision(1)
            .with_dpq("fortified")
            .with_layers(LayerMask::LAND),
    );
    data.air_heights.extend([
        AirHeightProfile::new(Layer::AirLow, "sky", 3),
        AirHeightProfile::new(Layer::AirMedium, "sky", 4),
        AirHeightProfile::new(Layer::AirHigh, "sky", 5),
    ]);
    data.skills.extend([
        SkillProfile::new("amphibious").with_cost_override("sea", 1),
        SkillProfile::new("veteran").with_modifier(SkillModifier::new(
            ModifierStat::Attack,
            ModifierScope::Own,
            1,
        )),
    ]);
    data.attack_rules.push(AttackRule::new(
        UnitClass::Armor,
        WeaponCategory::Cannon,
        UnitClass::Infantry,
        1,
    ));
    data.weapon_priorities.push(WeaponPriority {
        weapon: WeaponCategory::AntiAir,
        target: UnitClass::Helicopter,
    });
    Catalogs::build(data).expect("standard catalogs are valid")
}

/// A board of plains.
pub fn plains_board(columns: i32, rows: i32) -> Board {
    let mut board = Board::new(columns, rows);
    board.fill(&"plains".into());
    board
}

/// Replaces the terrain of `cell`.
pub fn set_terrain(board: &mut Board, cell: HexCell, terrain: &str) {
    board
        .set_tile(cell, Tile::new(terrain))
        .expect("cell is on the board");
}

// =============================================================================
// Units
// =============================================================================

/// Mounts catalog weapon `id` at full ammunition.
pub fn mount(catalogs: &Catalogs, id: &str) -> EmbarkedWeapon {
    let profile = catalogs.weapon(&id.into()).expect("weapon in catalog");
    EmbarkedWeapon::from_profile(profile).expect("weapon has a trajectory")
}

/// Spawns a unit of `class` on `layer` carrying the named weapons.
pub fn spawn_armed(
    board: &mut Board,
    catalogs: &Catalogs,
    team: Team,
    class: UnitClass,
    layer: Layer,
    cell: HexCell,
    weapons: &[&str],
) -> UnitId {
    let spec = weapons.iter().fold(
        UnitSpec::new(team, class, layer, cell).with_combat(CombatState::new(10, 3)),
        |spec, id| spec.with_weapon(mount(catalogs, id)),
    );
    board.spawn(spec).expect("cell is free")
}

/// Spawns a rifle squad.
pub fn spawn_infantry(board: &mut Board, catalogs: &Catalogs, team: Team, cell: HexCell) -> UnitId {
    spawn_armed(board, catalogs, team, UnitClass::Infantry, Layer::Land, cell, &["rifle"])
}

/// Spawns a tank with a cannon.
pub fn spawn_tank(board: &mut Board, catalogs: &Catalogs, team: Team, cell: HexCell) -> UnitId {
    spawn_armed(board, catalogs, team, UnitClass::Armor, Layer::Land, cell, &["cannon"])
}

/// Spawns a truck with one land slot of `capacity`.
pub fn spawn_truck(board: &mut Board, team: Team, cell: HexCell, capacity: u32) -> UnitId {
    board
        .spawn(
            UnitSpec::new(team, UnitClass::Transport, Layer::Land, cell)
                .with_transport(TransportBay::new([TransportSlot::new(capacity, LayerMask::LAND)])),
        )
        .expect("cell is free")
}

/// HP of a unit.
pub fn hp(board: &Board, id: UnitId) -> u32 {
    board.unit(id).expect("unit on board").combat.hp
}

/// Ammunition of a unit's weapon.
pub fn ammo(board: &Board, id: UnitId, index: usize) -> u32 {
    board.unit(id).expect("unit on board").weapons[index].ammo
}

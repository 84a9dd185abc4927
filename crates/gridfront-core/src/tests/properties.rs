//! Property tests for the rules invariants.

use proptest::prelude::*;

use hexfield::HexCell;

use crate::board::Board;
use crate::config::RulesConfig;
use crate::engine::RulesEngine;
use crate::layer::Layer;
use crate::resolver::{RoundingMode, StrikeRounding};
use crate::sensor::MovementMode;
use crate::unit::{CombatState, UnitClass, UnitFlags, UnitSpec};

use super::helpers::{
    ammo, hp, mount, plains_board, spawn_infantry, spawn_truck, standard_catalogs, BLUE, RED,
};

fn rounding() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::Floor),
        Just(RoundingMode::Ceil),
        Just(RoundingMode::Nearest),
    ]
}

proptest! {
    #[test]
    fn ammunition_never_goes_negative(requests in prop::collection::vec(0u32..6, 1..12)) {
        let catalogs = standard_catalogs();
        let mut board = plains_board(4, 4);
        let squad = spawn_infantry(&mut board, &catalogs, BLUE, HexCell::ORIGIN);

        let mut expected = 10u32;
        for amount in requests {
            match board.consume_ammo(squad, 0, amount) {
                Ok(left) => {
                    prop_assert!(amount <= expected);
                    expected -= amount;
                    prop_assert_eq!(left, expected);
                }
                Err(_) => prop_assert!(amount > expected),
            }
            prop_assert_eq!(ammo(&board, squad, 0), expected);
        }
    }

    #[test]
    fn hp_stays_within_bounds(max_hp in 1u32..30, values in prop::collection::vec(0u32..60, 1..10)) {
        let mut board = Board::new(3, 3);
        let unit = board
            .spawn(
                UnitSpec::new(BLUE, UnitClass::Infantry, Layer::Land, HexCell::ORIGIN)
                    .with_combat(CombatState::new(max_hp, 1)),
            )
            .unwrap();

        for value in values {
            let applied = board.set_hp(unit, value).unwrap();
            prop_assert_eq!(applied, value.min(max_hp));
            let eliminated = board.unit(unit).unwrap().flags.contains(UnitFlags::ELIMINATED);
            prop_assert_eq!(eliminated, applied == 0);
        }
    }

    #[test]
    fn rounding_stays_within_one(numerator in 0i64..10_000, denominator in 1i64..50) {
        let floor = RoundingMode::Floor.divide(numerator, denominator);
        let nearest = RoundingMode::Nearest.divide(numerator, denominator);
        let ceil = RoundingMode::Ceil.divide(numerator, denominator);
        prop_assert!(floor <= nearest && nearest <= ceil);
        prop_assert!(ceil - floor <= 1);
        prop_assert!(floor * denominator <= numerator);
    }

    #[test]
    fn strikes_follow_the_formula(
        attacker_hp in 1u32..20,
        defense in 1i32..8,
        mode in rounding(),
    ) {
        let catalogs = standard_catalogs();
        let mut config = RulesConfig::default();
        config.rounding.even = StrikeRounding::new(mode, mode);
        let engine = RulesEngine::with_config(catalogs, config);

        let mut board = plains_board(6, 6);
        let shooter = board
            .spawn(
                UnitSpec::new(BLUE, UnitClass::Infantry, Layer::Land, HexCell::new(2, 1))
                    .with_combat(CombatState::new(attacker_hp, 1))
                    .with_weapon(mount(engine.catalogs(), "rifle")),
            )
            .unwrap();
        let target = board
            .spawn(
                UnitSpec::new(RED, UnitClass::Armor, Layer::Land, HexCell::new(2, 2))
                    .with_combat(CombatState::new(100, defense)),
            )
            .unwrap();

        let option = engine
            .collect_targets(&board, shooter, MovementMode::Stationary)
            .valid
            .remove(0);
        let report = engine.resolve_combat(&mut board, &option);
        let trace = report.trace().unwrap();

        let expected = mode.divide(i64::from(attacker_hp) * 2, i64::from(defense));
        prop_assert_eq!(i64::from(trace.strike.eliminations), expected);
        prop_assert_eq!(i64::from(hp(&board, target)), 100 - expected);
        prop_assert_eq!(hp(&board, shooter), attacker_hp);
    }

    #[test]
    fn slots_never_overfill(capacity in 1u32..4, riders in 1usize..6) {
        let catalogs = standard_catalogs();
        let engine = RulesEngine::new(catalogs);
        let mut board = plains_board(8, 8);
        let center = HexCell::new(3, 3);
        let truck = spawn_truck(&mut board, BLUE, center, capacity);

        let cells = center.neighbors();
        let passengers: Vec<_> = cells
            .iter()
            .take(riders)
            .map(|cell| spawn_infantry(&mut board, engine.catalogs(), BLUE, *cell))
            .collect();

        for passenger in passengers {
            let report = engine.collect_embark_options(&board, passenger, 5);
            if let Some(option) = report.valid.first() {
                board.embark(option).unwrap();
            }
            prop_assert!(board.slot_occupancy(truck, 0).unwrap() <= capacity);
        }
        let expected = u32::try_from(riders).unwrap().min(capacity);
        prop_assert_eq!(board.slot_occupancy(truck, 0).unwrap(), expected);
    }
}

//! Combat resolver for one attack and its counter.
//!
//! The `CombatResolver` executes a [`TargetOption`] produced by the
//! targeting sensor:
//! - the attacker's weapon spends one round and strikes the defender
//! - if the option carries a counter and the counter weapon is still
//!   loaded, the defender strikes back in the same exchange
//!
//! # Resolution Order
//!
//! 1. Look up both units, both weapons and every skill involved, and
//!    measure the current distance between the units. Any structural
//!    problem or a target out of reach aborts here with an [`AbortReason`]
//!    and the board is left untouched. A counter needs the units to still
//!    be adjacent.
//! 2. Compute each strike against pre-combat HP:
//!    `attack = hp × max(0, power + rps attack + net skill attack)` and
//!    `defense = base + dpq bonus + rps defense + net skill defense`,
//!    floored at the configured minimum.
//! 3. Classify the positional matchup and round each quotient with the
//!    outcome's rounding.
//! 4. Spend ammunition and apply both HP changes together.
//!
//! Units reaching 0 HP are marked eliminated by the board. They are not
//! removed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::outcome::{CombatOutcome, RoundingMode};
use crate::board::Board;
use crate::catalog::{
    CatalogKind, Catalogs, DpqId, DpqTier, ModifierStat, WeaponCategory, WeaponId, WeaponProfile,
};
use crate::config::RulesConfig;
use crate::error::RulesError;
use crate::sensor::{CounterAssessment, NoCounterReason, TargetOption};
use crate::unit::{Unit, UnitClass, UnitId};
use crate::view::BoardView;

// =============================================================================
// Report
// =============================================================================

/// Why a resolution was abandoned before touching the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// A unit named by the option is not on the board.
    UnknownUnit(UnitId),
    /// A unit is eliminated or in reserve.
    InactiveUnit(UnitId),
    /// The attacker is riding a transporter.
    AttackerEmbarked(UnitId),
    /// Both units are on the same team.
    NotHostile,
    /// The attacker has no weapon at this index.
    WeaponIndexOutOfRange {
        /// The attacker.
        unit: UnitId,
        /// The requested embark index.
        index: usize,
    },
    /// The weapon at this index is not the one the option was built for.
    WeaponMismatch {
        /// The attacker.
        unit: UnitId,
        /// The embark index.
        index: usize,
    },
    /// The units are no longer within the weapon's range bracket.
    OutOfRange {
        /// The attacker.
        unit: UnitId,
        /// The embark index.
        index: usize,
        /// Current hex distance between the units.
        distance: u32,
    },
    /// The attacker's weapon is empty.
    NoAmmunition {
        /// The attacker.
        unit: UnitId,
        /// The embark index.
        index: usize,
    },
    /// A weapon or skill is missing from the catalogs.
    CatalogEntryMissing {
        /// Which catalog.
        kind: CatalogKind,
        /// The missing id.
        id: String,
    },
    /// The board refused the change.
    BoardRejected(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnit(id) => write!(f, "unit {id} is not on the board"),
            Self::InactiveUnit(id) => write!(f, "unit {id} cannot take part in combat"),
            Self::AttackerEmbarked(id) => write!(f, "unit {id} is embarked"),
            Self::NotHostile => write!(f, "units are on the same team"),
            Self::WeaponIndexOutOfRange { unit, index } => {
                write!(f, "unit {unit} has no weapon {index}")
            }
            Self::WeaponMismatch { unit, index } => {
                write!(f, "weapon {index} of unit {unit} changed since targeting")
            }
            Self::OutOfRange {
                unit,
                index,
                distance,
            } => write!(f, "weapon {index} of unit {unit} cannot reach distance {distance}"),
            Self::NoAmmunition { unit, index } => {
                write!(f, "weapon {index} of unit {unit} is empty")
            }
            Self::CatalogEntryMissing { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::BoardRejected(message) => write!(f, "board rejected the change: {message}"),
        }
    }
}

impl From<RulesError> for AbortReason {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::UnitNotFound(id) => Self::UnknownUnit(id),
            RulesError::CatalogEntryNotFound { kind, id } => Self::CatalogEntryMissing { kind, id },
            RulesError::WeaponIndexOutOfRange { unit, index } => {
                Self::WeaponIndexOutOfRange { unit, index }
            }
            RulesError::InsufficientAmmunition { unit, index, .. } => {
                Self::NoAmmunition { unit, index }
            }
            other => Self::BoardRejected(other.to_string()),
        }
    }
}

/// One side of the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTrace {
    /// The unit.
    pub unit: UnitId,
    /// Its class.
    pub class: UnitClass,
    /// HP before the exchange.
    pub hp_before: u32,
    /// HP after the exchange.
    pub hp_after: u32,
    /// Positional-quality tier it fought from.
    pub dpq: DpqId,
    /// Points of that tier.
    pub dpq_points: i32,
}

/// One strike, attacker's or counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeTrace {
    /// Embark index of the weapon.
    pub weapon_index: usize,
    /// Catalog id of the weapon.
    pub weapon: WeaponId,
    /// Its category.
    pub category: WeaponCategory,
    /// Rounds left before firing.
    pub ammo_before: u32,
    /// Rounds left after firing.
    pub ammo_after: u32,
    /// Base weapon power.
    pub power: i32,
    /// Class-matchup attack bonus.
    pub rps_attack: i32,
    /// Net skill attack modifier.
    pub skill_attack: i32,
    /// Striker HP times the modified power.
    pub effective_attack: i64,
    /// Base defense of the struck unit.
    pub base_defense: i32,
    /// Positional defense bonus of the struck unit.
    pub dpq_bonus: i32,
    /// Class-matchup defense bonus.
    pub rps_defense: i32,
    /// Net skill defense modifier.
    pub skill_defense: i32,
    /// Defense after the minimum floor.
    pub effective_defense: i32,
    /// Rounding applied to the quotient.
    pub rounding: RoundingMode,
    /// HP removed from the struck unit before clamping to its HP.
    pub eliminations: u32,
}

/// What the defender did in return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterStatus {
    /// The defender struck back.
    Fired(StrikeTrace),
    /// The defender did not.
    Withheld(NoCounterReason),
}

impl CounterStatus {
    /// The counter strike, if one happened.
    #[must_use]
    pub const fn strike(&self) -> Option<&StrikeTrace> {
        match self {
            Self::Fired(strike) => Some(strike),
            Self::Withheld(_) => None,
        }
    }
}

/// Every intermediate value of a resolved exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTrace {
    /// The attacking side.
    pub attacker: SideTrace,
    /// The defending side.
    pub defender: SideTrace,
    /// Hex distance of the engagement.
    pub distance: u32,
    /// Positional matchup.
    pub outcome: CombatOutcome,
    /// The attacker's strike.
    pub strike: StrikeTrace,
    /// The defender's counter.
    pub counter: CounterStatus,
}

/// Result of [`CombatResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatReport {
    /// Combat happened and was applied to the board.
    Resolved(CombatTrace),
    /// Nothing happened.
    Aborted(AbortReason),
}

impl CombatReport {
    /// Returns `true` if the exchange was applied.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The trace of an applied exchange.
    #[must_use]
    pub const fn trace(&self) -> Option<&CombatTrace> {
        match self {
            Self::Resolved(trace) => Some(trace),
            Self::Aborted(_) => None,
        }
    }

    /// Why the exchange was abandoned.
    #[must_use]
    pub const fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            Self::Resolved(_) => None,
            Self::Aborted(reason) => Some(reason),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

struct Fighter<'a> {
    unit: &'a Unit,
    dpq: &'a DpqTier,
}

struct Shot<'a> {
    index: usize,
    ammo: u32,
    profile: &'a WeaponProfile,
}

/// Resolves attacks against a board.
///
/// # Example
///
/// ```
/// use gridfront_core::board::Board;
/// use gridfront_core::catalog::{CatalogData, Catalogs, WeaponCategory, WeaponProfile};
/// use gridfront_core::config::RulesConfig;
/// use gridfront_core::layer::Layer;
/// use gridfront_core::resolver::CombatResolver;
/// use gridfront_core::sensor::{MovementMode, TargetingSensor};
/// use gridfront_core::unit::{CombatState, EmbarkedWeapon, Team, UnitClass, UnitSpec};
/// use gridfront_core::view::BoardView;
/// use hexfield::HexCell;
///
/// let howitzer = WeaponProfile::new("howitzer", WeaponCategory::Artillery, 5).with_range(2, 3);
/// let mut data = CatalogData::default();
/// data.weapons.push(howitzer.clone());
/// let catalogs = Catalogs::build(data).unwrap();
/// let config = RulesConfig::default();
///
/// let mut board = Board::new(8, 8);
/// let gun = board
///     .spawn(
///         UnitSpec::new(Team::new(1), UnitClass::Artillery, Layer::Land, HexCell::new(1, 1))
///             .with_weapon(EmbarkedWeapon::from_profile(&howitzer).unwrap()),
///     )
///     .unwrap();
/// let target = board
///     .spawn(
///         UnitSpec::new(Team::new(2), UnitClass::Infantry, Layer::Land, HexCell::new(1, 3))
///             .with_combat(CombatState::new(10, 5)),
///     )
///     .unwrap();
///
/// let view = BoardView::new(&board, &catalogs, &config);
/// let option = TargetingSensor::new()
///     .collect(&view, gun, MovementMode::Stationary)
///     .valid[0]
///     .clone();
///
/// let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
/// assert!(report.success());
/// assert_eq!(report.trace().unwrap().strike.effective_attack, 50);
/// assert_eq!(board.unit(target).unwrap().combat.hp, 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CombatResolver<'a> {
    catalogs: &'a Catalogs,
    config: &'a RulesConfig,
}

impl<'a> CombatResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(catalogs: &'a Catalogs, config: &'a RulesConfig) -> Self {
        Self { catalogs, config }
    }

    /// Resolves `option` on `board`.
    ///
    /// Either both sides' ammunition and HP are updated, or nothing is.
    pub fn resolve(&self, board: &mut Board, option: &TargetOption) -> CombatReport {
        let (trace, counter_index) = match self.plan(board, option) {
            Ok(plan) => plan,
            Err(reason) => {
                tracing::warn!(
                    attacker = ?option.attacker,
                    target = ?option.target,
                    %reason,
                    "combat aborted"
                );
                return CombatReport::Aborted(reason);
            }
        };
        Self::apply(board, trace, counter_index)
    }

    /// Validates the option and computes the exchange without mutating.
    fn plan(
        &self,
        board: &Board,
        option: &TargetOption,
    ) -> Result<(CombatTrace, Option<usize>), AbortReason> {
        let view = BoardView::new(board, self.catalogs, self.config);
        let attacker = board
            .unit(option.attacker)
            .ok_or(AbortReason::UnknownUnit(option.attacker))?;
        let defender = board
            .unit(option.target)
            .ok_or(AbortReason::UnknownUnit(option.target))?;
        for unit in [attacker, defender] {
            if !unit.is_active() {
                return Err(AbortReason::InactiveUnit(unit.id()));
            }
        }
        if attacker.is_embarked() {
            return Err(AbortReason::AttackerEmbarked(attacker.id()));
        }
        if attacker.is_allied_with(defender) {
            return Err(AbortReason::NotHostile);
        }

        let index = option.weapon_index;
        let weapon = attacker
            .weapon(index)
            .ok_or(AbortReason::WeaponIndexOutOfRange {
                unit: attacker.id(),
                index,
            })?;
        if weapon.weapon != option.weapon {
            return Err(AbortReason::WeaponMismatch {
                unit: attacker.id(),
                index,
            });
        }
        if !weapon.has_ammo() {
            return Err(AbortReason::NoAmmunition {
                unit: attacker.id(),
                index,
            });
        }
        let distance = match (
            board.effective_cell(attacker.id()),
            board.effective_cell(defender.id()),
        ) {
            (Some(from), Some(to)) => from.distance_to(to),
            (None, _) => return Err(AbortReason::UnknownUnit(attacker.id())),
            (_, None) => return Err(AbortReason::UnknownUnit(defender.id())),
        };
        if !weapon.in_range(distance) {
            return Err(AbortReason::OutOfRange {
                unit: attacker.id(),
                index,
                distance,
            });
        }
        let shot = Shot {
            index,
            ammo: weapon.ammo,
            profile: self.catalogs.weapon(&weapon.weapon)?,
        };

        let attacking = Fighter {
            unit: attacker,
            dpq: view.unit_dpq(attacker),
        };
        let defending = Fighter {
            unit: defender,
            dpq: view.unit_dpq(defender),
        };
        let outcome = self
            .catalogs
            .outcome_matrix()
            .classify(attacking.dpq.points, defending.dpq.points);
        let rounding = self.config.rounding.for_outcome(outcome);

        let strike = self.strike(&attacking, &defending, &shot, rounding.strike)?;
        let counter_shot = self.counter_shot(defender, &option.counter, distance);
        let counter = match &counter_shot {
            Ok(shot) => CounterStatus::Fired(self.strike(
                &defending,
                &attacking,
                shot,
                rounding.counter,
            )?),
            Err(reason) => CounterStatus::Withheld(*reason),
        };

        let side = |fighter: &Fighter<'_>, received: Option<&StrikeTrace>| {
            let hp = fighter.unit.combat.hp;
            SideTrace {
                unit: fighter.unit.id(),
                class: fighter.unit.class,
                hp_before: hp,
                hp_after: hp.saturating_sub(received.map_or(0, |s| s.eliminations)),
                dpq: fighter.dpq.id.clone(),
                dpq_points: fighter.dpq.points,
            }
        };
        let trace = CombatTrace {
            attacker: side(&attacking, counter.strike()),
            defender: side(&defending, Some(&strike)),
            distance,
            outcome,
            strike,
            counter,
        };
        Ok((trace, counter_shot.ok().map(|shot| shot.index)))
    }

    /// Picks up the counter weapon the option names, if it can still fire.
    fn counter_shot(
        &self,
        defender: &Unit,
        counter: &CounterAssessment,
        distance: u32,
    ) -> Result<Shot<'a>, NoCounterReason> {
        let (weapon_index, weapon) = match counter {
            CounterAssessment::Available {
                weapon_index,
                weapon,
            } => (*weapon_index, weapon),
            CounterAssessment::Unavailable(reason) => return Err(*reason),
        };
        if distance != 1 {
            tracing::debug!(defender = ?defender.id(), distance, "attacker no longer adjacent");
            return Err(NoCounterReason::DistanceNotOne);
        }
        let Some(mounted) = defender
            .weapon(weapon_index)
            .filter(|mounted| mounted.weapon == *weapon)
        else {
            tracing::debug!(defender = ?defender.id(), index = weapon_index, "counter weapon gone");
            return Err(NoCounterReason::WeaponUnavailable);
        };
        if !mounted.has_ammo() {
            tracing::debug!(defender = ?defender.id(), index = weapon_index, "counter weapon empty");
            return Err(NoCounterReason::NoAmmunition);
        }
        let profile = self.catalogs.weapon(weapon).map_err(|err| {
            tracing::warn!(%err, "counter weapon not in catalog");
            NoCounterReason::WeaponUnavailable
        })?;
        Ok(Shot {
            index: weapon_index,
            ammo: mounted.ammo,
            profile,
        })
    }

    fn strike(
        &self,
        striker: &Fighter<'_>,
        struck: &Fighter<'_>,
        shot: &Shot<'_>,
        rounding: RoundingMode,
    ) -> Result<StrikeTrace, AbortReason> {
        let category = shot.profile.category;
        let (attacker, defender) = (striker.unit, struck.unit);

        let rps_attack = self
            .catalogs
            .attack_bonus(attacker.class, category, defender.class);
        let skill_attack =
            self.catalogs
                .net_skill_bonus(ModifierStat::Attack, attacker, defender, Some(category))?;
        let power = shot
            .profile
            .power
            .saturating_add(rps_attack)
            .saturating_add(skill_attack)
            .max(0);
        let effective_attack = i64::from(attacker.combat.hp) * i64::from(power);

        let rps_defense = self
            .catalogs
            .defense_bonus(defender.class, attacker.class, category);
        let skill_defense =
            self.catalogs
                .net_skill_bonus(ModifierStat::Defense, defender, attacker, Some(category))?;
        let effective_defense = defender
            .combat
            .base_defense
            .saturating_add(struck.dpq.defense_bonus)
            .saturating_add(rps_defense)
            .saturating_add(skill_defense)
            .max(self.config.minimum_defense);

        let raw = rounding.divide(effective_attack, i64::from(effective_defense));
        let eliminations = u32::try_from(raw.max(0)).unwrap_or(u32::MAX);

        Ok(StrikeTrace {
            weapon_index: shot.index,
            weapon: shot.profile.id.clone(),
            category,
            ammo_before: shot.ammo,
            ammo_after: shot.ammo.saturating_sub(1),
            power: shot.profile.power,
            rps_attack,
            skill_attack,
            effective_attack,
            base_defense: defender.combat.base_defense,
            dpq_bonus: struck.dpq.defense_bonus,
            rps_defense,
            skill_defense,
            effective_defense,
            rounding,
            eliminations,
        })
    }

    fn apply(
        board: &mut Board,
        mut trace: CombatTrace,
        counter_index: Option<usize>,
    ) -> CombatReport {
        let (attacker, defender) = (trace.attacker.unit, trace.defender.unit);

        if let Err(err) = board.consume_ammo(attacker, trace.strike.weapon_index, 1) {
            let reason = AbortReason::from(err);
            tracing::warn!(?attacker, %reason, "combat aborted");
            return CombatReport::Aborted(reason);
        }
        if let Some(index) = counter_index {
            if let Err(err) = board.consume_ammo(defender, index, 1) {
                tracing::warn!(?defender, %err, "counter dropped");
                trace.counter = CounterStatus::Withheld(NoCounterReason::NoAmmunition);
                trace.attacker.hp_after = trace.attacker.hp_before;
            }
        }

        for side in [&trace.defender, &trace.attacker] {
            if let Err(err) = board.set_hp(side.unit, side.hp_after) {
                tracing::warn!(unit = ?side.unit, %err, "hp update failed");
            }
        }

        tracing::debug!(
            ?attacker,
            ?defender,
            outcome = %trace.outcome,
            dealt = trace.strike.eliminations,
            received = trace.counter.strike().map_or(0, |s| s.eliminations),
            "combat resolved"
        );
        CombatReport::Resolved(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Tile;
    use crate::catalog::{
        AttackRule, CatalogData, DefenseRule, DpqTier, ModifierScope, SkillId, SkillModifier,
        SkillProfile, TerrainProfile,
    };
    use crate::layer::Layer;
    use crate::sensor::{MovementMode, TargetingSensor};
    use crate::unit::{CombatState, EmbarkedWeapon, Team, UnitFlags, UnitSpec};
    use hexfield::HexCell;

    fn cannon() -> WeaponProfile {
        WeaponProfile::new("cannon", WeaponCategory::Cannon, 5).with_range(1, 2)
    }

    fn rifle() -> WeaponProfile {
        WeaponProfile::new("rifle", WeaponCategory::SmallArms, 2)
    }

    fn catalogs_with(edit: impl FnOnce(&mut CatalogData)) -> Catalogs {
        let mut data = CatalogData::default();
        data.weapons.extend([cannon(), rifle()]);
        data.dpq_tiers.push(DpqTier::new("hill", 3, 2));
        data.terrains.extend([
            TerrainProfile::new("plains"),
            TerrainProfile::new("hill").with_dpq("hill"),
        ]);
        edit(&mut data);
        Catalogs::build(data).unwrap()
    }

    fn tank(cell: HexCell, base_defense: i32) -> UnitSpec {
        UnitSpec::new(Team::new(1), UnitClass::Armor, Layer::Land, cell)
            .with_combat(CombatState::new(10, base_defense))
            .with_weapon(EmbarkedWeapon::from_profile(&cannon()).unwrap())
    }

    fn infantry(cell: HexCell, base_defense: i32) -> UnitSpec {
        UnitSpec::new(Team::new(2), UnitClass::Infantry, Layer::Land, cell)
            .with_combat(CombatState::new(10, base_defense))
            .with_weapon(EmbarkedWeapon::from_profile(&rifle()).unwrap())
    }

    fn board() -> Board {
        let mut board = Board::new(8, 8);
        board.fill(&"plains".into());
        board
    }

    fn first_option(
        board: &Board,
        catalogs: &Catalogs,
        config: &RulesConfig,
        attacker: UnitId,
    ) -> TargetOption {
        let view = BoardView::new(board, catalogs, config);
        TargetingSensor::new()
            .collect(&view, attacker, MovementMode::Stationary)
            .valid
            .remove(0)
    }

    mod formula_tests {
        use super::*;

        #[test]
        fn baseline_exchange_without_counter() {
            let catalogs = catalogs_with(|_| {});
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            let d = board
                .spawn(
                    UnitSpec::new(Team::new(2), UnitClass::Infantry, Layer::Land, HexCell::new(2, 4))
                        .with_combat(CombatState::new(10, 5)),
                )
                .unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let trace = report.trace().unwrap();
            assert_eq!(trace.outcome, CombatOutcome::Even);
            assert_eq!(trace.strike.effective_attack, 50);
            assert_eq!(trace.strike.effective_defense, 5);
            assert_eq!(trace.strike.eliminations, 10);
            assert_eq!(
                trace.counter,
                CounterStatus::Withheld(NoCounterReason::DistanceNotOne)
            );

            let defender = board.unit(d).unwrap();
            assert_eq!(defender.combat.hp, 0);
            assert!(defender.flags.contains(UnitFlags::ELIMINATED));
            assert!(!defender.is_active());
            assert_eq!(board.unit(a).unwrap().weapons[0].ammo, 9);
        }

        #[test]
        fn counter_is_simultaneous() {
            let catalogs = catalogs_with(|data| data.weapons[0].power = 3);
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            let d = board.spawn(infantry(HexCell::new(2, 3), 5)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);
            assert!(option.counter.is_available());

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let trace = report.trace().unwrap();
            // 10 × 3 / 5 and 10 × 2 / 4
            assert_eq!(trace.defender.hp_after, 4);
            assert_eq!(trace.attacker.hp_after, 5);
            assert_eq!(board.unit(d).unwrap().combat.hp, 4);
            assert_eq!(board.unit(a).unwrap().combat.hp, 5);
            assert_eq!(board.unit(d).unwrap().weapons[0].ammo, 9);
            assert_eq!(board.unit(a).unwrap().weapons[0].ammo, 9);
        }

        #[test]
        fn matchup_and_skill_modifiers() {
            let catalogs = catalogs_with(|data| {
                data.attack_rules.push(AttackRule::new(
                    UnitClass::Armor,
                    WeaponCategory::Cannon,
                    UnitClass::Infantry,
                    2,
                ));
                data.defense_rules.push(DefenseRule::new(
                    UnitClass::Infantry,
                    UnitClass::Armor,
                    WeaponCategory::Cannon,
                    3,
                ));
                data.skills.push(SkillProfile::new("veteran").with_modifier(SkillModifier::new(
                    ModifierStat::Attack,
                    ModifierScope::Own,
                    1,
                )));
            });
            let config = RulesConfig::default();
            let mut board = board();
            let a = board
                .spawn(tank(HexCell::new(2, 2), 4).with_skill(SkillId::new("veteran")))
                .unwrap();
            board.spawn(infantry(HexCell::new(2, 4), 5)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let strike = &report.trace().unwrap().strike;
            assert_eq!((strike.rps_attack, strike.skill_attack), (2, 1));
            assert_eq!(strike.effective_attack, 80);
            assert_eq!(strike.effective_defense, 8);
            assert_eq!(strike.eliminations, 10);
        }

        #[test]
        fn extreme_terms_saturate() {
            let catalogs = catalogs_with(|data| {
                data.weapons[0].power = i32::MAX;
                data.attack_rules.push(AttackRule::new(
                    UnitClass::Armor,
                    WeaponCategory::Cannon,
                    UnitClass::Infantry,
                    2,
                ));
                data.defense_rules.push(DefenseRule::new(
                    UnitClass::Infantry,
                    UnitClass::Armor,
                    WeaponCategory::Cannon,
                    3,
                ));
            });
            let config = RulesConfig::default();
            let mut board = board();
            let a = board
                .spawn(tank(HexCell::new(2, 2), 4).with_combat(CombatState::new(u32::MAX, 4)))
                .unwrap();
            let d = board
                .spawn(infantry(HexCell::new(2, 3), 5).with_combat(CombatState::new(10, i32::MAX)))
                .unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let strike = &report.trace().unwrap().strike;
            assert_eq!(
                strike.effective_attack,
                i64::from(u32::MAX) * i64::from(i32::MAX)
            );
            assert_eq!(strike.effective_defense, i32::MAX);
            assert_eq!(strike.eliminations, u32::MAX);
            assert_eq!(board.unit(d).unwrap().combat.hp, 0);
        }

        #[test]
        fn defense_is_floored() {
            let catalogs = catalogs_with(|data| {
                data.skills.push(SkillProfile::new("exposed").with_modifier(SkillModifier::new(
                    ModifierStat::Defense,
                    ModifierScope::Own,
                    -5,
                )));
            });
            let config = RulesConfig {
                minimum_defense: 2,
                ..RulesConfig::default()
            };
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            board
                .spawn(infantry(HexCell::new(2, 4), 1).with_skill(SkillId::new("exposed")))
                .unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let strike = &report.trace().unwrap().strike;
            assert_eq!(strike.skill_defense, -5);
            assert_eq!(strike.effective_defense, 2);
            assert_eq!(strike.eliminations, 25);
            assert_eq!(report.trace().unwrap().defender.hp_after, 0);
        }

        #[test]
        fn positional_edge_changes_rounding() {
            let catalogs = catalogs_with(|data| data.weapons[0].power = 2);
            let config = RulesConfig::default();
            let mut board = board();
            board.set_tile(HexCell::new(2, 2), Tile::new("hill")).unwrap();
            let a = board.spawn(tank(HexCell::new(2, 2), 1)).unwrap();
            board.spawn(infantry(HexCell::new(2, 3), 3)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let trace = report.trace().unwrap();
            assert_eq!(trace.outcome, CombatOutcome::AttackerDominant);
            // 20 / 3 rounded up, 20 / 3 rounded down (hill adds 2 to base 1)
            assert_eq!(trace.strike.eliminations, 7);
            let counter = trace.counter.strike().unwrap();
            assert_eq!(counter.dpq_bonus, 2);
            assert_eq!(counter.effective_defense, 3);
            assert_eq!(counter.rounding, RoundingMode::Floor);
            assert_eq!(counter.eliminations, 6);
        }
    }

    mod abort_tests {
        use super::*;

        fn setup() -> (Catalogs, RulesConfig, Board, UnitId, UnitId) {
            let catalogs = catalogs_with(|_| {});
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            let d = board.spawn(infantry(HexCell::new(2, 3), 5)).unwrap();
            (catalogs, config, board, a, d)
        }

        fn assert_untouched(board: &Board, a: UnitId, d: UnitId) {
            assert_eq!(board.unit(a).unwrap().combat.hp, 10);
            assert_eq!(board.unit(d).unwrap().combat.hp, 10);
            assert_eq!(board.unit(a).unwrap().weapons[0].ammo, 10);
            assert_eq!(board.unit(d).unwrap().weapons[0].ammo, 10);
        }

        #[test]
        fn empty_weapon_aborts() {
            let (catalogs, config, mut board, a, d) = setup();
            let option = first_option(&board, &catalogs, &config, a);
            board.consume_ammo(a, 0, 10).unwrap();

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert_eq!(
                report.abort_reason(),
                Some(&AbortReason::NoAmmunition { unit: a, index: 0 })
            );
            assert_eq!(board.unit(d).unwrap().combat.hp, 10);
            assert_eq!(board.unit(d).unwrap().weapons[0].ammo, 10);
        }

        #[test]
        fn bad_weapon_index_aborts() {
            let (catalogs, config, mut board, a, d) = setup();
            let mut option = first_option(&board, &catalogs, &config, a);
            option.weapon_index = 4;

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert_eq!(
                report.abort_reason(),
                Some(&AbortReason::WeaponIndexOutOfRange { unit: a, index: 4 })
            );
            assert_untouched(&board, a, d);
        }

        #[test]
        fn missing_units_abort() {
            let (catalogs, config, mut board, a, d) = setup();
            let option = first_option(&board, &catalogs, &config, a);
            assert!(board.despawn(d).is_some());

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert_eq!(report.abort_reason(), Some(&AbortReason::UnknownUnit(d)));
            assert_eq!(board.unit(a).unwrap().weapons[0].ammo, 10);
        }

        #[test]
        fn eliminated_target_aborts() {
            let (catalogs, config, mut board, a, d) = setup();
            let option = first_option(&board, &catalogs, &config, a);
            board.set_hp(d, 0).unwrap();

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert_eq!(report.abort_reason(), Some(&AbortReason::InactiveUnit(d)));
            assert_eq!(board.unit(a).unwrap().weapons[0].ammo, 10);
        }

        #[test]
        fn target_moved_out_of_reach_aborts() {
            let (catalogs, config, mut board, a, d) = setup();
            let option = first_option(&board, &catalogs, &config, a);
            board.move_unit(a, HexCell::new(2, 6)).unwrap();

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert_eq!(
                report.abort_reason(),
                Some(&AbortReason::OutOfRange {
                    unit: a,
                    index: 0,
                    distance: 3,
                })
            );
            assert_untouched(&board, a, d);
        }

        #[test]
        fn unknown_skill_aborts() {
            let (catalogs, config, mut board, a, d) = setup();
            let option = first_option(&board, &catalogs, &config, a);
            board
                .unit_mut(d)
                .unwrap()
                .skills
                .push(SkillId::new("phantom"));

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            assert!(matches!(
                report.abort_reason(),
                Some(AbortReason::CatalogEntryMissing {
                    kind: CatalogKind::Skill,
                    ..
                })
            ));
            assert_untouched(&board, a, d);
        }
    }

    mod counter_tests {
        use super::*;

        #[test]
        fn emptied_counter_weapon_is_dropped() {
            let catalogs = catalogs_with(|_| {});
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            let d = board.spawn(infantry(HexCell::new(2, 3), 5)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);
            assert!(option.counter.is_available());
            board.consume_ammo(d, 0, 10).unwrap();

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let trace = report.trace().unwrap();
            assert_eq!(
                trace.counter,
                CounterStatus::Withheld(NoCounterReason::NoAmmunition)
            );
            assert_eq!(trace.attacker.hp_after, 10);
            assert_eq!(board.unit(a).unwrap().combat.hp, 10);
        }

        #[test]
        fn counter_needs_adjacency_at_resolution() {
            let catalogs = catalogs_with(|_| {});
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            let d = board.spawn(infantry(HexCell::new(2, 3), 5)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);
            assert!(option.counter.is_available());
            board.move_unit(a, HexCell::new(2, 1)).unwrap();

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let trace = report.trace().unwrap();
            assert_eq!(trace.distance, 2);
            assert_eq!(
                trace.counter,
                CounterStatus::Withheld(NoCounterReason::DistanceNotOne)
            );
            assert_eq!(board.unit(a).unwrap().combat.hp, 10);
            assert_eq!(board.unit(d).unwrap().weapons[0].ammo, 10);
        }

        #[test]
        fn trace_serializes() {
            let catalogs = catalogs_with(|_| {});
            let config = RulesConfig::default();
            let mut board = board();
            let a = board.spawn(tank(HexCell::new(2, 2), 4)).unwrap();
            board.spawn(infantry(HexCell::new(2, 3), 5)).unwrap();
            let option = first_option(&board, &catalogs, &config, a);

            let report = CombatResolver::new(&catalogs, &config).resolve(&mut board, &option);
            let json = serde_json::to_string(&report).unwrap();
            let back: CombatReport = serde_json::from_str(&json).unwrap();
            assert_eq!(report, back);
        }
    }
}

//! End-to-end scenarios for the `reservoir-core` economy.
//!
//! These drive [`ResourceEconomy`] through the same entry points a host
//! uses: binding, turn events, extraction, and exchange.

use std::cell::RefCell;
use std::rc::Rc;

use reservoir_core::config::ProductionMode;
use reservoir_core::{
    EconomyError, MemoryStore, NotificationLog, ResourceEconomy, Settings, TurnTrigger, outcome,
};
use reservoir_types::{
    CapacityTier, CharacterId, ExtractionMethod, MAX_LEVEL, Pool, RoutingPolicy, WarningLevel,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

type Economy = ResourceEconomy<MemoryStore, NotificationLog>;

fn enabled_economy(name: &str, settings: Settings) -> Economy {
    let mut economy = ResourceEconomy::new(MemoryStore::new(), NotificationLog::new(), settings);
    assert!(economy.bind_character(CharacterId::from(name)).is_ok());
    assert!(economy.set_enabled(true).is_ok());
    economy.notifier_mut().drain();
    economy
}

fn run_turns(economy: &mut Economy, turns: u32) -> Vec<(u32, WarningLevel)> {
    let mut warnings = Vec::new();
    for _ in 0..turns {
        let result = economy.advance();
        assert!(result.is_ok());
        if let Some(warning) = result.ok().flatten() {
            warnings.push((warning.streak, warning.level));
        }
    }
    warnings
}

// =============================================================================
// Production and overflow escalation
// =============================================================================

#[test]
fn medium_level_one_escalates_after_capacity() {
    let mut economy = enabled_economy("Aya", Settings::default());

    // 399 turns: 399 units, still under the 400 capacity.
    assert!(run_turns(&mut economy, 399).is_empty());
    assert_eq!(economy.state().map(|s| s.overfull_streak), Some(0));

    // Turn 400 reaches capacity.
    assert_eq!(
        run_turns(&mut economy, 1),
        vec![(1, WarningLevel::Discomfort)]
    );

    // Turns 401-402 are silent, 403 is the fourth overfull turn.
    assert!(run_turns(&mut economy, 2).is_empty());
    assert_eq!(run_turns(&mut economy, 1), vec![(4, WarningLevel::Pain)]);

    // Turns 404-405 are silent, 406 onwards is severe on every turn.
    assert!(run_turns(&mut economy, 2).is_empty());
    assert_eq!(
        run_turns(&mut economy, 3),
        vec![
            (7, WarningLevel::SeverePain),
            (8, WarningLevel::SeverePain),
            (9, WarningLevel::SeverePain),
        ]
    );

    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(408)));

    let levels: Vec<Option<WarningLevel>> = economy
        .notifier()
        .entries()
        .iter()
        .map(|n| n.warning)
        .collect();
    assert_eq!(
        levels,
        vec![
            Some(WarningLevel::Discomfort),
            Some(WarningLevel::Pain),
            Some(WarningLevel::SeverePain),
            Some(WarningLevel::SeverePain),
            Some(WarningLevel::SeverePain),
        ]
    );
}

#[test]
fn streak_survives_production_and_resets_on_relief() {
    let mut economy = enabled_economy("Aya", Settings::default());
    assert!(economy.set_capacity_tier(CapacityTier::Small).is_ok());
    run_turns(&mut economy, 205);
    assert_eq!(economy.state().map(|s| s.overfull_streak), Some(6));

    // Manual takes 50: 205 -> 155, below capacity 200.
    assert!(economy.extract(ExtractionMethod::Manual).is_ok());
    assert_eq!(economy.state().map(|s| s.overfull_streak), Some(0));

    // Back to full: the ladder starts over.
    let warnings = run_turns(&mut economy, 45);
    assert_eq!(warnings, vec![(1, WarningLevel::Discomfort)]);
}

#[test]
fn scaled_mode_uses_base_yield() {
    let settings = Settings {
        production_mode: ProductionMode::Scaled,
        base_yield_per_turn: 20,
        ..Settings::default()
    };
    let mut economy = enabled_economy("Aya", settings);
    run_turns(&mut economy, 3);
    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(60)));
    assert_eq!(economy.yield_per_turn().ok(), Some(dec!(20)));
}

// =============================================================================
// Extraction and progression
// =============================================================================

#[test]
fn mechanical_extraction_from_250() {
    let mut economy = enabled_economy("Aya", Settings::default());
    run_turns(&mut economy, 250);

    let extraction = economy.extract(ExtractionMethod::Mechanical);
    assert!(extraction.is_ok());
    let extraction = extraction.ok();
    assert_eq!(extraction.as_ref().map(|e| e.amount), Some(dec!(100)));
    assert_eq!(extraction.as_ref().map(|e| e.experience), Some(10));
    assert_eq!(extraction.and_then(|e| e.routed_to), Some(Pool::A));

    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(150)));
    assert_eq!(economy.state().map(|s| s.experience), Some(10));
    assert_eq!(economy.pools().ok().map(|p| p.pool_a), Some(dec!(100)));
}

#[test]
fn disabled_character_cannot_be_extracted() {
    let mut economy = enabled_economy("Aya", Settings::default());
    run_turns(&mut economy, 10);
    assert!(economy.set_enabled(false).is_ok());

    let result = economy.extract(ExtractionMethod::Manual);
    assert!(matches!(result, Err(EconomyError::NotEnabled)));
    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(10)));

    // Disabled characters do not produce either.
    assert!(run_turns(&mut economy, 5).is_empty());
    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(10)));
}

#[test]
fn level_is_capped_and_experience_retained() {
    let mut economy = enabled_economy("Aya", Settings::default());
    let gained = economy.add_experience(1_000_000);
    assert_eq!(gained.ok(), Some(9));
    assert_eq!(economy.state().map(|s| s.level), Some(MAX_LEVEL));

    let before = economy.state().map(|s| s.experience);
    assert_eq!(economy.add_experience(500).ok(), Some(0));
    assert_eq!(
        economy.state().map(|s| s.experience),
        before.map(|e| e.saturating_add(500))
    );
}

#[test]
fn level_up_raises_capacity_and_yield() {
    let mut economy = enabled_economy("Aya", Settings::default());
    assert_eq!(economy.capacity().ok(), Some(dec!(400)));
    assert!(economy.add_experience(100).is_ok());
    assert_eq!(economy.capacity().ok(), Some(dec!(440)));
    assert_eq!(economy.yield_per_turn().ok(), Some(dec!(2)));
}

// =============================================================================
// Storage and exchange
// =============================================================================

#[test]
fn sell_fifty_from_two_hundred() {
    let mut economy = enabled_economy("Aya", Settings::default());
    run_turns(&mut economy, 200);
    assert!(economy.extract(ExtractionMethod::Mechanical).is_ok());
    assert!(economy.extract(ExtractionMethod::Mechanical).is_ok());
    assert_eq!(economy.pools().ok().map(|p| p.pool_a), Some(dec!(200)));

    let sale = outcome(economy.sell(Pool::A, dec!(50)));
    assert!(sale.success);
    assert_eq!(sale.amount, dec!(50));
    assert_eq!(sale.message, "Sold 50 from pool A for $5.00");

    assert_eq!(economy.pools().ok().map(|p| p.pool_a), Some(dec!(150)));
    assert_eq!(economy.state().map(|s| s.wallet), Some(dec!(5)));
}

#[test]
fn transfer_round_trip_and_overdraft() {
    let mut economy = enabled_economy("Aya", Settings::default());
    assert!(economy.set_routing_policy(RoutingPolicy::PoolB).is_ok());
    run_turns(&mut economy, 40);
    assert!(economy.extract(ExtractionMethod::Manual).is_ok());
    let original = economy.pools().ok();
    assert_eq!(original.map(|p| p.pool_b), Some(dec!(40)));

    assert!(economy.transfer(Pool::B, Pool::A, dec!(25)).is_ok());
    assert!(economy.transfer(Pool::A, Pool::B, dec!(25)).is_ok());
    assert_eq!(economy.pools().ok(), original);

    let overdraft = outcome(economy.transfer(Pool::A, Pool::B, dec!(1)));
    assert!(!overdraft.success);
    assert_eq!(overdraft.amount, Decimal::ZERO);
    assert_eq!(economy.pools().ok(), original);
}

#[test]
fn sale_requires_a_bound_character() {
    let mut economy: Economy =
        ResourceEconomy::new(MemoryStore::new(), NotificationLog::new(), Settings::default());
    assert!(matches!(
        economy.sell(Pool::A, dec!(1)),
        Err(EconomyError::NoCharacter)
    ));
}

// =============================================================================
// Binding and host wiring
// =============================================================================

#[test]
fn state_persists_across_rebinding() {
    let mut economy = enabled_economy("Aya", Settings::default());
    assert!(economy.set_capacity_tier(CapacityTier::Large).is_ok());
    run_turns(&mut economy, 12);

    assert!(economy.bind_character(CharacterId::from("Bo")).is_ok());
    assert_eq!(economy.state().map(|s| s.enabled), Some(false));
    assert!(matches!(
        economy.extract(ExtractionMethod::Manual),
        Err(EconomyError::NotEnabled)
    ));

    assert!(economy.bind_character(CharacterId::from("Aya")).is_ok());
    let state = economy.state().cloned();
    assert_eq!(state.as_ref().map(|s| s.capacity_tier), Some(CapacityTier::Large));
    assert_eq!(state.map(|s| s.current_amount), Some(dec!(12)));
}

#[test]
fn turn_trigger_drives_only_the_bound_character() {
    let economy = Rc::new(RefCell::new(enabled_economy("Aya", Settings::default())));

    let mut trigger = TurnTrigger::new();
    let handle = Rc::clone(&economy);
    trigger.on_turn_advance(move |speaker| {
        let result = handle.borrow_mut().on_turn(speaker);
        assert!(result.is_ok());
    });

    for speaker in ["Aya", "User", "Aya", "Bo", "Aya"] {
        assert_eq!(trigger.fire(&CharacterId::from(speaker)), 1);
    }

    assert_eq!(
        economy.borrow().state().map(|s| s.current_amount),
        Some(dec!(3))
    );
}

#[test]
fn notifications_off_still_returns_results() {
    let settings = Settings {
        enable_notifications: false,
        ..Settings::default()
    };
    let mut economy = enabled_economy("Aya", settings);
    assert!(economy.set_capacity_tier(CapacityTier::Small).is_ok());
    let warnings = run_turns(&mut economy, 200);
    assert_eq!(warnings, vec![(1, WarningLevel::Discomfort)]);
    assert!(economy.notifier().entries().is_empty());
}

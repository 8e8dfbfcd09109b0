//! Integration tests for `reservoir-db` driven through the economy.
//!
//! Each test works in its own scratch directory under the system temp dir
//! and removes it afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use reservoir_core::{NoOpNotifier, ResourceEconomy, Settings};
use reservoir_db::JsonFileStore;
use reservoir_types::{CapacityTier, CharacterId, ExtractionMethod, Pool, RoutingPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn temp_dir(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!("reservoir-db-integration-{prefix}-{unique}"))
}

fn open_economy(path: &Path) -> Option<ResourceEconomy<JsonFileStore, NoOpNotifier>> {
    let store = JsonFileStore::open(path).ok()?;
    Some(ResourceEconomy::new(store, NoOpNotifier, Settings::default()))
}

#[test]
fn character_and_pools_survive_restart() {
    let dir = temp_dir("restart");
    let path = dir.join("state.json");

    {
        let economy = open_economy(&path);
        assert!(economy.is_some());
        let Some(mut economy) = economy else { return };
        assert!(economy.bind_character(CharacterId::from("Rin")).is_ok());
        assert!(economy.set_enabled(true).is_ok());
        assert!(economy.set_capacity_tier(CapacityTier::Large).is_ok());
        assert!(economy.set_routing_policy(RoutingPolicy::PoolB).is_ok());
        for _ in 0..120 {
            assert!(economy.advance().is_ok());
        }
        assert!(economy.extract(ExtractionMethod::Mechanical).is_ok());
        assert!(economy.sell(Pool::B, dec!(40)).is_ok());
    }

    let economy = open_economy(&path);
    assert!(economy.is_some());
    let Some(mut economy) = economy else { return };
    assert!(economy.bind_character(CharacterId::from("Rin")).is_ok());

    let state = economy.state().cloned();
    assert_eq!(state.as_ref().map(|s| s.enabled), Some(true));
    assert_eq!(state.as_ref().map(|s| s.capacity_tier), Some(CapacityTier::Large));
    assert_eq!(state.as_ref().map(|s| s.routing_policy), Some(RoutingPolicy::PoolB));
    assert_eq!(state.as_ref().map(|s| s.current_amount), Some(dec!(20)));
    assert_eq!(state.as_ref().map(|s| s.experience), Some(10));
    assert_eq!(state.map(|s| s.wallet), Some(dec!(4)));

    let pools = economy.pools().ok();
    assert_eq!(pools.map(|p| p.pool_a), Some(Decimal::ZERO));
    assert_eq!(pools.map(|p| p.pool_b), Some(dec!(60)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rejected_operations_write_nothing() {
    let dir = temp_dir("rejected");
    let path = dir.join("state.json");

    let economy = open_economy(&path);
    assert!(economy.is_some());
    let Some(mut economy) = economy else { return };
    assert!(economy.bind_character(CharacterId::from("Rin")).is_ok());

    assert!(economy.extract(ExtractionMethod::Manual).is_err());
    assert!(economy.transfer(Pool::A, Pool::B, dec!(5)).is_err());
    assert!(economy.sell(Pool::A, dec!(5)).is_err());
    assert!(!path.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn turn_counts_persist_one_tick_at_a_time() {
    let dir = temp_dir("ticks");
    let path = dir.join("state.json");

    for _ in 0..3 {
        let economy = open_economy(&path);
        assert!(economy.is_some());
        let Some(mut economy) = economy else { return };
        assert!(economy.bind_character(CharacterId::from("Kai")).is_ok());
        assert!(economy.set_enabled(true).is_ok());
        assert!(economy.on_turn(&CharacterId::from("Kai")).is_ok());
    }

    let economy = open_economy(&path);
    let Some(mut economy) = economy else { return };
    assert!(economy.bind_character(CharacterId::from("Kai")).is_ok());
    assert_eq!(economy.state().map(|s| s.current_amount), Some(dec!(3)));

    let _ = fs::remove_dir_all(&dir);
}

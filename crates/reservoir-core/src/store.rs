//! Key-value persistence for character and shared state.
//!
//! The host's variable store is modelled as a [`KvStore`] addressed by a
//! composite [`StoreKey`]: a [`Scope`] (global, or one character) plus an
//! enumerated [`Field`]. Names are never concatenated into key strings.
//!
//! # Key layout
//!
//! | Scope | Fields |
//! |-------|--------|
//! | `Character(id)` | `Enabled`, `Level`, `Experience`, `CapacityTier`, `CurrentAmount`, `OverfullStreak`, `RoutingPolicy`, `Wallet` |
//! | `Global` | `PoolA`, `PoolB` |
//!
//! [`Persistence`] maps whole [`CharacterState`] and [`SharedPools`] records
//! onto those fields. Missing fields load as defaults; malformed fields are
//! logged and replaced by defaults, so one bad value never locks a
//! character out.
//!
//! Writes are staged with [`KvStore::set`] and become durable together on
//! [`KvStore::commit`]. If a commit fails the store drops the staged
//! writes via [`KvStore::discard`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use reservoir_types::{CharacterId, CharacterState, MAX_LEVEL, MIN_LEVEL, SharedPools};

/// Errors raised by a [`KvStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend failed to read or write.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Namespace a value lives in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Shared by every character on the store.
    Global,
    /// Owned by one character.
    Character(CharacterId),
}

/// A named variable within a [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// [`CharacterState::enabled`].
    Enabled,
    /// [`CharacterState::level`].
    Level,
    /// [`CharacterState::experience`].
    Experience,
    /// [`CharacterState::capacity_tier`].
    CapacityTier,
    /// [`CharacterState::current_amount`].
    CurrentAmount,
    /// [`CharacterState::overfull_streak`].
    OverfullStreak,
    /// [`CharacterState::routing_policy`].
    RoutingPolicy,
    /// [`CharacterState::wallet`].
    Wallet,
    /// [`SharedPools::pool_a`].
    PoolA,
    /// [`SharedPools::pool_b`].
    PoolB,
}

/// Composite `(scope, field)` address of a stored value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    /// Owning scope.
    pub scope: Scope,
    /// Variable name.
    pub field: Field,
}

impl StoreKey {
    /// Key for a character-scoped field.
    pub fn character(id: &CharacterId, field: Field) -> Self {
        Self {
            scope: Scope::Character(id.clone()),
            field,
        }
    }

    /// Key for a global field.
    pub const fn global(field: Field) -> Self {
        Self {
            scope: Scope::Global,
            field,
        }
    }
}

/// A durable key-value store supplied by the host.
pub trait KvStore {
    /// Read a value, seeing any staged writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError>;

    /// Stage a write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn set(&mut self, key: StoreKey, value: Value) -> Result<(), StoreError>;

    /// Make every staged write durable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the writes could not be made durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Drop staged writes that were never committed.
    fn discard(&mut self);
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A [`KvStore`] held entirely in memory.
///
/// Commits always succeed; the store lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    committed: BTreeMap<StoreKey, Value>,
    staged: BTreeMap<StoreKey, Value>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            committed: BTreeMap::new(),
            staged: BTreeMap::new(),
        }
    }

    /// Number of committed values.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self
            .staged
            .get(key)
            .or_else(|| self.committed.get(key))
            .cloned())
    }

    fn set(&mut self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        self.staged.insert(key, value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.committed.append(&mut self.staged);
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
    }
}

// ---------------------------------------------------------------------------
// Record mapping
// ---------------------------------------------------------------------------

/// Maps state records onto a [`KvStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KvStore> Persistence<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Load a character's state, defaulting every missing field.
    ///
    /// Levels outside 1--10 and negative quantities are clamped back into
    /// range.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    pub fn load_character_state(&self, id: &CharacterId) -> Result<CharacterState, StoreError> {
        let defaults = CharacterState::default();
        let key = |field| StoreKey::character(id, field);

        let level: u32 = self.read_or(&key(Field::Level), defaults.level)?;
        Ok(CharacterState {
            enabled: self.read_or(&key(Field::Enabled), defaults.enabled)?,
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
            experience: self.read_or(&key(Field::Experience), defaults.experience)?,
            capacity_tier: self.read_or(&key(Field::CapacityTier), defaults.capacity_tier)?,
            current_amount: non_negative(
                self.read_or(&key(Field::CurrentAmount), defaults.current_amount)?,
            ),
            overfull_streak: self.read_or(&key(Field::OverfullStreak), defaults.overfull_streak)?,
            routing_policy: self.read_or(&key(Field::RoutingPolicy), defaults.routing_policy)?,
            wallet: non_negative(self.read_or(&key(Field::Wallet), defaults.wallet)?),
        })
    }

    /// Load the shared pools, defaulting to empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    pub fn load_shared_pools(&self) -> Result<SharedPools, StoreError> {
        Ok(SharedPools {
            pool_a: non_negative(self.read_or(&StoreKey::global(Field::PoolA), Decimal::ZERO)?),
            pool_b: non_negative(self.read_or(&StoreKey::global(Field::PoolB), Decimal::ZERO)?),
        })
    }

    /// Durably save a character's state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write or the commit fails; staged
    /// writes are discarded in that case.
    pub fn save_character_state(
        &mut self,
        id: &CharacterId,
        state: &CharacterState,
    ) -> Result<(), StoreError> {
        self.save(Some((id, state)), None)
    }

    /// Durably save the shared pools.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write or the commit fails.
    pub fn save_shared_pools(&mut self, pools: &SharedPools) -> Result<(), StoreError> {
        self.save(None, Some(pools))
    }

    /// Durably save a character and, optionally, the shared pools in one commit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any write or the commit fails; nothing from
    /// this call is left staged in that case.
    pub fn save(
        &mut self,
        character: Option<(&CharacterId, &CharacterState)>,
        pools: Option<&SharedPools>,
    ) -> Result<(), StoreError> {
        let result = self
            .stage(character, pools)
            .and_then(|()| self.store.commit());
        if result.is_err() {
            self.store.discard();
        }
        result
    }

    fn stage(
        &mut self,
        character: Option<(&CharacterId, &CharacterState)>,
        pools: Option<&SharedPools>,
    ) -> Result<(), StoreError> {
        if let Some((id, state)) = character {
            let key = |field| StoreKey::character(id, field);
            self.write(key(Field::Enabled), &state.enabled)?;
            self.write(key(Field::Level), &state.level)?;
            self.write(key(Field::Experience), &state.experience)?;
            self.write(key(Field::CapacityTier), &state.capacity_tier)?;
            self.write(key(Field::CurrentAmount), &state.current_amount)?;
            self.write(key(Field::OverfullStreak), &state.overfull_streak)?;
            self.write(key(Field::RoutingPolicy), &state.routing_policy)?;
            self.write(key(Field::Wallet), &state.wallet)?;
        }
        if let Some(pools) = pools {
            self.write(StoreKey::global(Field::PoolA), &pools.pool_a)?;
            self.write(StoreKey::global(Field::PoolB), &pools.pool_b)?;
        }
        Ok(())
    }

    fn write<T: Serialize>(&mut self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.store.set(key, value)
    }

    fn read_or<T: DeserializeOwned>(&self, key: &StoreKey, default: T) -> Result<T, StoreError> {
        let Some(value) = self.store.get(key)? else {
            return Ok(default);
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                warn!(?key, error = %err, "Malformed stored value, using default");
                Ok(default)
            }
        }
    }
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

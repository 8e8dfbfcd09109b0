//! The per-character resource economy.
//!
//! [`ResourceEconomy`] binds one character at a time and runs every
//! operation against that character's [`CharacterState`] and the shared
//! pools. Each mutating operation follows the same shape:
//!
//! 1. Copy the current records
//! 2. Validate and mutate the copies
//! 3. Durably save the copies
//! 4. Commit the copies in memory and notify
//!
//! A rejected or unsaved operation therefore never leaves a half-applied
//! state behind, either in memory or in the store.

use rust_decimal::Decimal;
use tracing::{debug, info};

use reservoir_types::{
    CapacityTier, CharacterId, CharacterState, Extraction, ExtractionMethod, OverflowWarning, Pool,
    Progress, RoutingPolicy, Sale, SharedPools, Transfer, WarningLevel,
};

use crate::config::Settings;
use crate::curves::{capacity, required_experience, yield_per_turn};
use crate::error::EconomyError;
use crate::exchange::{apply_sale, apply_transfer};
use crate::extraction::apply_extraction;
use crate::notify::{Notification, Notifier};
use crate::production::apply_production_tick;
use crate::progression;
use crate::store::{KvStore, Persistence};

/// The character currently bound to the economy.
#[derive(Debug, Clone)]
struct Binding {
    id: CharacterId,
    state: CharacterState,
}

/// Per-character resource state machine and economy engine.
#[derive(Debug)]
pub struct ResourceEconomy<S, N> {
    persistence: Persistence<S>,
    notifier: N,
    settings: Settings,
    binding: Option<Binding>,
}

impl<S: KvStore, N: Notifier> ResourceEconomy<S, N> {
    /// Create an economy over `store` with no character bound.
    pub fn new(store: S, notifier: N, settings: Settings) -> Self {
        Self {
            persistence: Persistence::new(store),
            notifier,
            settings: settings.resolved(),
            binding: None,
        }
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// Switch to `id`, loading its state (defaults on first access).
    ///
    /// Re-binding the character that is already bound does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Persistence`] if the state cannot be loaded;
    /// the previous binding is kept in that case.
    pub fn bind_character(&mut self, id: CharacterId) -> Result<(), EconomyError> {
        if self.character() == Some(&id) {
            return Ok(());
        }
        let state = self.persistence.load_character_state(&id)?;
        info!(
            character = %id,
            enabled = state.enabled,
            level = state.level,
            amount = %state.current_amount,
            "Character bound"
        );
        self.binding = Some(Binding { id, state });
        Ok(())
    }

    /// Re-read the bound character's state from the store.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] if nothing is bound, or
    /// [`EconomyError::Persistence`] if the load fails.
    pub fn reload(&mut self) -> Result<(), EconomyError> {
        let binding = self.binding.as_mut().ok_or(EconomyError::NoCharacter)?;
        binding.state = self.persistence.load_character_state(&binding.id)?;
        debug!(character = %binding.id, "Character state reloaded");
        Ok(())
    }

    /// The bound character, if any.
    pub fn character(&self) -> Option<&CharacterId> {
        self.binding.as_ref().map(|b| &b.id)
    }

    /// The bound character's state, if any.
    pub fn state(&self) -> Option<&CharacterState> {
        self.binding.as_ref().map(|b| &b.state)
    }

    /// Resolved engine settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Borrow the notifier.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutably borrow the notifier.
    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        self.persistence.store()
    }

    // -----------------------------------------------------------------------
    // Production
    // -----------------------------------------------------------------------

    /// Turn-trigger entry point: advance only if `speaker` is the bound character.
    ///
    /// # Errors
    ///
    /// See [`ResourceEconomy::advance`].
    pub fn on_turn(
        &mut self,
        speaker: &CharacterId,
    ) -> Result<Option<OverflowWarning>, EconomyError> {
        if self.character() != Some(speaker) {
            return Ok(None);
        }
        self.advance()
    }

    /// Run one production tick for the bound character.
    ///
    /// Returns `Ok(None)` without touching anything when no character is
    /// bound or production is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Persistence`] or
    /// [`EconomyError::ArithmeticOverflow`]; state is unchanged on error.
    pub fn advance(&mut self) -> Result<Option<OverflowWarning>, EconomyError> {
        let Some(binding) = self.binding.as_ref() else {
            return Ok(None);
        };
        if !binding.state.enabled {
            return Ok(None);
        }

        let mut next = binding.state.clone();
        let tick = apply_production_tick(&mut next, &self.settings, &binding.id)?;
        self.commit(next, None)?;

        if let Some(warning) = &tick.warning {
            self.emit(warning.message.clone(), Some(warning.level));
        }
        Ok(tick.warning)
    }

    // -----------------------------------------------------------------------
    // Extraction & progression
    // -----------------------------------------------------------------------

    /// Extract from the bound character with `method`.
    ///
    /// With no character bound there is nothing producing, so this fails
    /// the same way as a disabled character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnabled`], [`EconomyError::Empty`], or a
    /// persistence/arithmetic error. State is unchanged on error.
    pub fn extract(&mut self, method: ExtractionMethod) -> Result<Extraction, EconomyError> {
        let binding = self.binding.as_ref().ok_or(EconomyError::NotEnabled)?;
        let mut next = binding.state.clone();
        let mut pools = self.persistence.load_shared_pools()?;

        let extraction = apply_extraction(&mut next, &mut pools, method, &binding.id)?;
        let touched_pools = extraction.routed_to.is_some();
        self.commit(next, touched_pools.then_some(&pools))?;

        self.emit(extraction.message.clone(), None);
        if extraction.levels_gained > 0 {
            self.announce_level();
        }
        Ok(extraction)
    }

    /// Award experience to the bound character directly.
    ///
    /// Returns the number of levels gained.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or a persistence/arithmetic
    /// error. State is unchanged on error.
    pub fn add_experience(&mut self, amount: u64) -> Result<u32, EconomyError> {
        let binding = self.binding.as_ref().ok_or(EconomyError::NoCharacter)?;
        let mut next = binding.state.clone();
        let gained = progression::add_experience(&mut next, amount)?;
        self.commit(next, None)?;
        if gained > 0 {
            self.announce_level();
        }
        Ok(gained)
    }

    // -----------------------------------------------------------------------
    // Storage & exchange
    // -----------------------------------------------------------------------

    /// Move `amount` between the shared pools.
    ///
    /// Does not require a bound character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidAmount`],
    /// [`EconomyError::InsufficientFunds`], or a persistence/arithmetic
    /// error. Balances are unchanged on error.
    pub fn transfer(
        &mut self,
        source: Pool,
        destination: Pool,
        amount: Decimal,
    ) -> Result<Transfer, EconomyError> {
        let mut pools = self.persistence.load_shared_pools()?;
        let transfer = apply_transfer(&mut pools, source, destination, amount)?;
        self.persistence.save_shared_pools(&pools)?;
        Ok(transfer)
    }

    /// Sell `amount` from `source` into the bound character's wallet.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`], [`EconomyError::InvalidAmount`],
    /// [`EconomyError::InsufficientFunds`], or a persistence/arithmetic
    /// error. Balances are unchanged on error.
    pub fn sell(&mut self, source: Pool, amount: Decimal) -> Result<Sale, EconomyError> {
        let binding = self.binding.as_ref().ok_or(EconomyError::NoCharacter)?;
        let mut next = binding.state.clone();
        let mut pools = self.persistence.load_shared_pools()?;
        let sale = apply_sale(&mut next, &mut pools, source, amount)?;
        self.commit(next, Some(&pools))?;
        Ok(sale)
    }

    /// Current shared pool balances.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Persistence`] if the store cannot be read.
    pub fn pools(&self) -> Result<SharedPools, EconomyError> {
        Ok(self.persistence.load_shared_pools()?)
    }

    // -----------------------------------------------------------------------
    // Character settings
    // -----------------------------------------------------------------------

    /// Switch production on or off for the bound character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or [`EconomyError::Persistence`].
    pub fn set_enabled(&mut self, enabled: bool) -> Result<String, EconomyError> {
        let (id, mut next) = self.staged()?;
        next.enabled = enabled;
        self.commit(next, None)?;

        let message = if enabled {
            format!("{id}'s production is now active")
        } else {
            format!("{id}'s production is now disabled")
        };
        self.emit(message.clone(), None);
        Ok(message)
    }

    /// Change the bound character's capacity tier.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or [`EconomyError::Persistence`].
    pub fn set_capacity_tier(&mut self, tier: CapacityTier) -> Result<String, EconomyError> {
        let (id, mut next) = self.staged()?;
        next.capacity_tier = tier;
        self.commit(next, None)?;

        let message = format!("{id}'s capacity tier set to {tier}");
        self.emit(message.clone(), None);
        Ok(message)
    }

    /// Change where the bound character's stored extraction yields go.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or [`EconomyError::Persistence`].
    pub fn set_routing_policy(&mut self, policy: RoutingPolicy) -> Result<String, EconomyError> {
        let (id, mut next) = self.staged()?;
        next.routing_policy = policy;
        self.commit(next, None)?;

        let message = match policy.pool() {
            Some(pool) => format!("{id}'s extractions now go to {pool}"),
            None => format!("{id}'s extractions are now discarded"),
        };
        self.emit(message.clone(), None);
        Ok(message)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Capacity of the bound character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or
    /// [`EconomyError::ArithmeticOverflow`].
    pub fn capacity(&self) -> Result<Decimal, EconomyError> {
        let state = self.state().ok_or(EconomyError::NoCharacter)?;
        capacity(state.capacity_tier, state.level)
    }

    /// Per-turn yield of the bound character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`] or
    /// [`EconomyError::ArithmeticOverflow`].
    pub fn yield_per_turn(&self) -> Result<Decimal, EconomyError> {
        let state = self.state().ok_or(EconomyError::NoCharacter)?;
        yield_per_turn(state.level, &self.settings)
    }

    /// Panel snapshot of the bound character.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NoCharacter`], [`EconomyError::Persistence`],
    /// or [`EconomyError::ArithmeticOverflow`].
    pub fn progress(&self) -> Result<Progress, EconomyError> {
        let state = self.state().ok_or(EconomyError::NoCharacter)?;
        let capacity = capacity(state.capacity_tier, state.level)?;
        let next_level_experience = required_experience(state.level);

        Ok(Progress {
            amount_percent: percent(state.current_amount, capacity)?.min(Decimal::ONE_HUNDRED),
            experience_percent: percent(
                Decimal::from(state.experience),
                Decimal::from(next_level_experience),
            )?,
            next_level_experience,
            yield_per_turn: yield_per_turn(state.level, &self.settings)?,
            capacity,
            pools: self.persistence.load_shared_pools()?,
            wallet: state.wallet,
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Clone the bound character's identity and state for staging.
    fn staged(&self) -> Result<(CharacterId, CharacterState), EconomyError> {
        let binding = self.binding.as_ref().ok_or(EconomyError::NoCharacter)?;
        Ok((binding.id.clone(), binding.state.clone()))
    }

    /// Persist staged records, then adopt them in memory.
    fn commit(
        &mut self,
        next: CharacterState,
        pools: Option<&SharedPools>,
    ) -> Result<(), EconomyError> {
        let binding = self.binding.as_mut().ok_or(EconomyError::NoCharacter)?;
        self.persistence.save(Some((&binding.id, &next)), pools)?;
        binding.state = next;
        Ok(())
    }

    fn announce_level(&mut self) {
        if let Some(binding) = &self.binding {
            let message = format!("{} reached level {}", binding.id, binding.state.level);
            self.emit(message, None);
        }
    }

    fn emit(&mut self, message: String, warning: Option<WarningLevel>) {
        if !self.settings.enable_notifications {
            return;
        }
        let Some(binding) = &self.binding else {
            return;
        };
        self.notifier.notify(Notification {
            character: binding.id.clone(),
            warning,
            message,
        });
    }
}

/// `part / whole * 100`, or zero when `whole` is zero.
fn percent(part: Decimal, whole: Decimal) -> Result<Decimal, EconomyError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(whole))
        .ok_or_else(|| EconomyError::overflow("percentage"))
}

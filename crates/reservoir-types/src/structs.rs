//! Core state structs for the Reservoir economy.
//!
//! [`CharacterState`] is the per-character record; [`SharedPools`] is the
//! global storage record. Both serialize with [`Decimal`] quantities so
//! that persisted amounts are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CapacityTier, ExtractionMethod, Pool, RoutingPolicy, WarningLevel};

/// Lowest character level.
pub const MIN_LEVEL: u32 = 1;

/// Highest character level. Experience past this point is retained but
/// never converts into another level.
pub const MAX_LEVEL: u32 = 10;

// ---------------------------------------------------------------------------
// CharacterState
// ---------------------------------------------------------------------------

/// Mutable per-character gauge and economy state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterState {
    /// Whether production is active for this character.
    pub enabled: bool,
    /// Current level, 1 through 10.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u64,
    /// Base capacity class.
    pub capacity_tier: CapacityTier,
    /// Accrued resource not yet extracted.
    #[ts(as = "String")]
    pub current_amount: Decimal,
    /// Consecutive production ticks that ended at or above capacity.
    pub overfull_streak: u32,
    /// Destination for stored extraction yields.
    pub routing_policy: RoutingPolicy,
    /// Currency balance earned by selling stored resource.
    #[ts(as = "String")]
    pub wallet: Decimal,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            enabled: false,
            level: MIN_LEVEL,
            experience: 0,
            capacity_tier: CapacityTier::default(),
            current_amount: Decimal::ZERO,
            overfull_streak: 0,
            routing_policy: RoutingPolicy::default(),
            wallet: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// SharedPools
// ---------------------------------------------------------------------------

/// Global storage accumulators shared by every character on a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SharedPools {
    /// Balance of [`Pool::A`].
    #[ts(as = "String")]
    pub pool_a: Decimal,
    /// Balance of [`Pool::B`].
    #[ts(as = "String")]
    pub pool_b: Decimal,
}

impl SharedPools {
    /// Balance held in `pool`.
    pub const fn balance(&self, pool: Pool) -> Decimal {
        match pool {
            Pool::A => self.pool_a,
            Pool::B => self.pool_b,
        }
    }

    /// Mutable access to the balance held in `pool`.
    pub const fn balance_mut(&mut self, pool: Pool) -> &mut Decimal {
        match pool {
            Pool::A => &mut self.pool_a,
            Pool::B => &mut self.pool_b,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// A warning raised by a production tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OverflowWarning {
    /// Severity of the warning.
    pub level: WarningLevel,
    /// Streak value that triggered it.
    pub streak: u32,
    /// Human-readable message.
    pub message: String,
}

/// Successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Extraction {
    /// Method used.
    pub method: ExtractionMethod,
    /// Amount removed from the character.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Experience awarded.
    pub experience: u64,
    /// Pool credited, or `None` when the amount was consumed or discarded.
    pub routed_to: Option<Pool>,
    /// Number of levels gained from the awarded experience.
    pub levels_gained: u32,
    /// Human-readable description.
    pub message: String,
}

/// Successful pool-to-pool transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Transfer {
    /// Debited pool.
    pub source: Pool,
    /// Credited pool.
    pub destination: Pool,
    /// Amount moved.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Human-readable description.
    pub message: String,
}

/// Successful sale of stored resource for currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Sale {
    /// Debited pool.
    pub source: Pool,
    /// Amount sold.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Currency earned.
    #[ts(as = "String")]
    pub earned: Decimal,
    /// Wallet balance after the sale.
    #[ts(as = "String")]
    pub wallet: Decimal,
    /// Human-readable description.
    pub message: String,
}

/// Panel-facing snapshot of the bound character's gauges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Progress {
    /// Fill level as a percentage of capacity, capped at 100.
    #[ts(as = "String")]
    pub amount_percent: Decimal,
    /// Progress toward the next level as a percentage.
    #[ts(as = "String")]
    pub experience_percent: Decimal,
    /// Experience required to clear the current level.
    pub next_level_experience: u64,
    /// Amount produced per turn at the current level.
    #[ts(as = "String")]
    pub yield_per_turn: Decimal,
    /// Current capacity.
    #[ts(as = "String")]
    pub capacity: Decimal,
    /// Shared pool balances.
    pub pools: SharedPools,
    /// Character wallet.
    #[ts(as = "String")]
    pub wallet: Decimal,
}

/// Structured `{success, amount, message}` view of any operation result.
///
/// Failures carry a zero amount and the error's description so a UI can
/// render them without matching on error variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OperationOutcome {
    /// Whether the operation committed.
    pub success: bool,
    /// Amount moved by the operation (zero on failure or when not applicable).
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Human-readable description.
    pub message: String,
}

impl OperationOutcome {
    /// A committed operation.
    pub fn succeeded(amount: Decimal, message: impl Into<String>) -> Self {
        Self {
            success: true,
            amount,
            message: message.into(),
        }
    }

    /// A rejected operation.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            amount: Decimal::ZERO,
            message: message.into(),
        }
    }
}

impl From<Extraction> for OperationOutcome {
    fn from(extraction: Extraction) -> Self {
        Self::succeeded(extraction.amount, extraction.message)
    }
}

impl From<Transfer> for OperationOutcome {
    fn from(transfer: Transfer) -> Self {
        Self::succeeded(transfer.amount, transfer.message)
    }
}

impl From<Sale> for OperationOutcome {
    fn from(sale: Sale) -> Self {
        Self::succeeded(sale.amount, sale.message)
    }
}

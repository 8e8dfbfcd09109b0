//! Storage pools and currency exchange.
//!
//! Stored resource lives in two shared pools. It can be moved between
//! them or sold for currency at a fixed rate of ten units per currency
//! unit. Amounts are validated before any balance changes, so a rejected
//! request leaves both pools and the wallet untouched.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use reservoir_types::{CharacterState, Pool, Sale, SharedPools, Transfer};

use crate::error::EconomyError;

/// Units of resource per unit of currency.
pub const EXCHANGE_RATE: Decimal = Decimal::TEN;

/// Parse a user-entered quantity.
///
/// # Errors
///
/// Returns [`EconomyError::InvalidAmount`] if the input is not a number or
/// is not strictly positive.
pub fn parse_amount(input: &str) -> Result<Decimal, EconomyError> {
    let amount = Decimal::from_str(input.trim()).map_err(|_err| EconomyError::InvalidAmount {
        input: input.to_owned(),
    })?;
    ensure_positive(amount)
}

/// Reject zero and negative amounts.
///
/// # Errors
///
/// Returns [`EconomyError::InvalidAmount`] if `amount <= 0`.
pub fn ensure_positive(amount: Decimal) -> Result<Decimal, EconomyError> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(EconomyError::invalid_amount(amount))
    }
}

/// Currency earned by selling `amount`.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if the division fails.
pub fn sale_value(amount: Decimal) -> Result<Decimal, EconomyError> {
    amount
        .checked_div(EXCHANGE_RATE)
        .ok_or_else(|| EconomyError::overflow("sale value"))
}

fn ensure_funds(pools: &SharedPools, pool: Pool, amount: Decimal) -> Result<(), EconomyError> {
    let available = pools.balance(pool);
    if available < amount {
        return Err(EconomyError::InsufficientFunds {
            pool,
            requested: amount,
            available,
        });
    }
    Ok(())
}

/// Credit `amount` to `pool`.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if the balance overflows.
pub fn credit(pools: &mut SharedPools, pool: Pool, amount: Decimal) -> Result<(), EconomyError> {
    let balance = pools.balance_mut(pool);
    *balance = balance
        .checked_add(amount)
        .ok_or_else(|| EconomyError::overflow("pool credit"))?;
    Ok(())
}

fn debit(pools: &mut SharedPools, pool: Pool, amount: Decimal) -> Result<(), EconomyError> {
    let balance = pools.balance_mut(pool);
    *balance = balance
        .checked_sub(amount)
        .ok_or_else(|| EconomyError::overflow("pool debit"))?;
    Ok(())
}

/// Move `amount` from `source` to `destination`.
///
/// Transferring a pool into itself validates the same way and leaves the
/// balance unchanged.
///
/// # Errors
///
/// Returns [`EconomyError::InvalidAmount`] or
/// [`EconomyError::InsufficientFunds`] before touching any balance.
pub fn apply_transfer(
    pools: &mut SharedPools,
    source: Pool,
    destination: Pool,
    amount: Decimal,
) -> Result<Transfer, EconomyError> {
    let amount = ensure_positive(amount)?;
    ensure_funds(pools, source, amount)?;

    debit(pools, source, amount)?;
    credit(pools, destination, amount)?;

    debug!(%source, %destination, %amount, "Pool transfer");
    Ok(Transfer {
        source,
        destination,
        amount,
        message: format!("Transferred {amount} from {source} to {destination}"),
    })
}

/// Sell `amount` from `source` into the character's wallet.
///
/// # Errors
///
/// Returns [`EconomyError::InvalidAmount`] or
/// [`EconomyError::InsufficientFunds`] before touching any balance.
pub fn apply_sale(
    state: &mut CharacterState,
    pools: &mut SharedPools,
    source: Pool,
    amount: Decimal,
) -> Result<Sale, EconomyError> {
    let amount = ensure_positive(amount)?;
    ensure_funds(pools, source, amount)?;
    let earned = sale_value(amount)?;
    let wallet = state
        .wallet
        .checked_add(earned)
        .ok_or_else(|| EconomyError::overflow("wallet credit"))?;

    debit(pools, source, amount)?;
    state.wallet = wallet;

    debug!(%source, %amount, %earned, %wallet, "Sale");
    Ok(Sale {
        source,
        amount,
        earned,
        wallet,
        message: format!("Sold {amount} from {source} for ${earned:.2}"),
    })
}

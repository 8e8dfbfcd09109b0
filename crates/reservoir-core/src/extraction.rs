//! Extraction: removing accrued resource from a character.
//!
//! | Method | Cap per use | Experience | Destination |
//! |--------|-------------|------------|-------------|
//! | Manual | 50 | `max(1, floor(amount / 5))` | routing policy |
//! | Direct | 60 | `max(1, floor(amount / 4))` | consumed |
//! | Mechanical | 100 | `max(1, floor(amount / 10))` | routing policy |
//!
//! Direct consumption earns the most experience per unit but never
//! produces storable resource, whatever the routing policy says.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use reservoir_types::{
    CharacterId, CharacterState, Extraction, ExtractionMethod, Pool, SharedPools,
};

use crate::curves::capacity;
use crate::error::EconomyError;
use crate::exchange::credit;
use crate::progression::add_experience;

/// Most that one use of `method` can extract.
pub fn extraction_cap(method: ExtractionMethod) -> Decimal {
    match method {
        ExtractionMethod::Manual => Decimal::from(50),
        ExtractionMethod::Direct => Decimal::from(60),
        ExtractionMethod::Mechanical => Decimal::ONE_HUNDRED,
    }
}

/// Units of resource per point of experience.
const fn experience_divisor(method: ExtractionMethod) -> u32 {
    match method {
        ExtractionMethod::Manual => 5,
        ExtractionMethod::Direct => 4,
        ExtractionMethod::Mechanical => 10,
    }
}

/// Experience earned for extracting `amount` with `method`; never less than 1.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if the division fails or the
/// result does not fit in a `u64`.
pub fn experience_reward(method: ExtractionMethod, amount: Decimal) -> Result<u64, EconomyError> {
    let points = amount
        .checked_div(Decimal::from(experience_divisor(method)))
        .ok_or_else(|| EconomyError::overflow("experience reward"))?
        .floor()
        .to_u64()
        .ok_or_else(|| EconomyError::overflow("experience reward range"))?;
    Ok(points.max(1))
}

/// Whether `method` stores its yield according to the routing policy.
pub const fn stores_yield(method: ExtractionMethod) -> bool {
    !matches!(method, ExtractionMethod::Direct)
}

fn describe(
    method: ExtractionMethod,
    amount: Decimal,
    routed_to: Option<Pool>,
    name: &CharacterId,
) -> String {
    let action = match method {
        ExtractionMethod::Manual => format!("{name} extracted {amount} by hand"),
        ExtractionMethod::Direct => {
            return format!("{amount} was consumed directly from {name}");
        }
        ExtractionMethod::Mechanical => format!("A machine extracted {amount} from {name}"),
    };
    match routed_to {
        Some(pool) => format!("{action} into {pool}"),
        None => format!("{action} and discarded it"),
    }
}

/// Extract from an enabled character, routing the yield and awarding experience.
///
/// # Order of operations
///
/// 1. Reject disabled or empty characters
/// 2. Take `min(cap, current_amount)`
/// 3. Route the amount (direct consumption always discards)
/// 4. Award experience, applying level-ups
/// 5. Reset the overfull streak if the character is now below capacity
///
/// # Errors
///
/// Returns [`EconomyError::NotEnabled`] or [`EconomyError::Empty`] without
/// mutating anything, or [`EconomyError::ArithmeticOverflow`].
pub fn apply_extraction(
    state: &mut CharacterState,
    pools: &mut SharedPools,
    method: ExtractionMethod,
    character: &CharacterId,
) -> Result<Extraction, EconomyError> {
    // 1. Validate
    if !state.enabled {
        return Err(EconomyError::NotEnabled);
    }
    if state.current_amount <= Decimal::ZERO {
        return Err(EconomyError::Empty);
    }

    // 2. Take
    let amount = extraction_cap(method).min(state.current_amount);
    let experience = experience_reward(method, amount)?;
    state.current_amount = state
        .current_amount
        .checked_sub(amount)
        .ok_or_else(|| EconomyError::overflow("extraction debit"))?;

    // 3. Route
    let routed_to = if stores_yield(method) {
        state.routing_policy.pool()
    } else {
        None
    };
    if let Some(pool) = routed_to {
        credit(pools, pool, amount)?;
    }

    // 4. Experience
    let levels_gained = add_experience(state, experience)?;

    // 5. Streak reset
    if state.current_amount < capacity(state.capacity_tier, state.level)? {
        state.overfull_streak = 0;
    }

    debug!(
        character = %character,
        %method,
        %amount,
        experience,
        routed_to = ?routed_to,
        remaining = %state.current_amount,
        "Extraction"
    );

    Ok(Extraction {
        method,
        amount,
        experience,
        routed_to,
        levels_gained,
        message: describe(method, amount, routed_to, character),
    })
}

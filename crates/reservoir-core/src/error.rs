//! Error types for the reservoir-core crate.
//!
//! Every economy operation validates before it mutates and returns a typed
//! [`EconomyError`] on rejection. Nothing in the engine panics; hosts turn
//! errors into user-facing text through their [`Display`] implementation
//! or [`OperationOutcome`](reservoir_types::OperationOutcome).
//!
//! [`Display`]: core::fmt::Display

use rust_decimal::Decimal;

use reservoir_types::{OperationOutcome, ParseSelectorError, Pool};

use crate::store::StoreError;

/// Errors that can occur during economy operations.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// No character is bound to the economy.
    #[error("no character is selected")]
    NoCharacter,

    /// Production is switched off for the bound character.
    #[error("production is not enabled")]
    NotEnabled,

    /// There is no accrued resource to extract.
    #[error("nothing available to extract")]
    Empty,

    /// A quantity was zero, negative, or not a number.
    #[error("invalid amount: {input:?} (expected a positive number)")]
    InvalidAmount {
        /// The rejected input, as received.
        input: String,
    },

    /// The source pool holds less than the requested amount.
    #[error("insufficient funds in {pool}: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The pool being debited.
        pool: Pool,
        /// The amount the caller asked for.
        requested: Decimal,
        /// The pool's balance.
        available: Decimal,
    },

    /// A tier, routing, method, or pool selector was not recognised.
    #[error(transparent)]
    InvalidSelector(#[from] ParseSelectorError),

    /// The state store failed to load or save.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// A decimal computation overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: &'static str,
    },
}

impl EconomyError {
    /// Shorthand for [`EconomyError::ArithmeticOverflow`].
    pub(crate) const fn overflow(context: &'static str) -> Self {
        Self::ArithmeticOverflow { context }
    }

    /// Shorthand for [`EconomyError::InvalidAmount`] from a decimal.
    pub(crate) fn invalid_amount(amount: Decimal) -> Self {
        Self::InvalidAmount {
            input: amount.to_string(),
        }
    }
}

/// Collapse any operation result into the UI-facing `{success, amount, message}` view.
pub fn outcome<T>(result: Result<T, EconomyError>) -> OperationOutcome
where
    T: Into<OperationOutcome>,
{
    match result {
        Ok(value) => value.into(),
        Err(err) => OperationOutcome::failed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn insufficient_funds_message_names_the_pool() {
        let err = EconomyError::InsufficientFunds {
            pool: Pool::B,
            requested: dec!(30),
            available: dec!(12.5),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds in pool B: requested 30, available 12.5"
        );
    }

    #[test]
    fn selector_errors_pass_through() {
        let parse = "huge".parse::<reservoir_types::CapacityTier>();
        let err = parse.map_err(EconomyError::from).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some(String::from("unrecognised capacity tier: \"huge\""))
        );
    }

    #[test]
    fn failures_become_zero_amount_outcomes() {
        let result: Result<reservoir_types::Sale, EconomyError> = Err(EconomyError::Empty);
        let view = outcome(result);
        assert!(!view.success);
        assert_eq!(view.amount, Decimal::ZERO);
        assert_eq!(view.message, "nothing available to extract");
    }
}

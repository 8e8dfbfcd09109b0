//! Per-turn production and overflow escalation.
//!
//! Each turn the bound character accrues its level's yield. A turn that
//! ends at or above capacity extends the overfull streak, and specific
//! streak values raise a warning from [`WARNING_THRESHOLDS`].
//!
//! Production never shortens the streak. Only an extraction that leaves the
//! character below capacity resets it (see [`crate::extraction`]).

use rust_decimal::Decimal;
use tracing::{debug, warn};

use reservoir_types::{CharacterId, CharacterState, OverflowWarning, WarningLevel};

use crate::config::Settings;
use crate::curves::{capacity, yield_per_turn};
use crate::error::EconomyError;

/// One row of the escalation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningThreshold {
    /// Streak value at which the warning fires.
    pub streak: u32,
    /// Warning raised.
    pub level: WarningLevel,
    /// Whether the warning keeps firing for every streak value past `streak`.
    pub repeats: bool,
}

impl WarningThreshold {
    const fn matches(&self, streak: u32) -> bool {
        if self.repeats {
            streak >= self.streak
        } else {
            streak == self.streak
        }
    }
}

/// Escalation table, evaluated every production tick.
pub const WARNING_THRESHOLDS: [WarningThreshold; 3] = [
    WarningThreshold {
        streak: 1,
        level: WarningLevel::Discomfort,
        repeats: false,
    },
    WarningThreshold {
        streak: 4,
        level: WarningLevel::Pain,
        repeats: false,
    },
    WarningThreshold {
        streak: 7,
        level: WarningLevel::SeverePain,
        repeats: true,
    },
];

/// Warning level for a streak value, if any.
pub fn warning_for_streak(streak: u32) -> Option<WarningLevel> {
    WARNING_THRESHOLDS
        .iter()
        .find(|threshold| threshold.matches(streak))
        .map(|threshold| threshold.level)
}

/// User-facing text for a warning.
pub fn warning_message(level: WarningLevel, character: &CharacterId) -> String {
    match level {
        WarningLevel::Discomfort => format!("{character} feels uncomfortably full"),
        WarningLevel::Pain => {
            format!("{character} winces from the pressure. The reservoir needs to be emptied!")
        }
        WarningLevel::SeverePain => {
            format!("{character} is in severe pain from overfilling!")
        }
    }
}

/// What a production tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionTick {
    /// Amount added this tick.
    pub produced: Decimal,
    /// Capacity the amount was compared against.
    pub capacity: Decimal,
    /// Warning raised this tick, if any.
    pub warning: Option<OverflowWarning>,
}

/// Apply one production tick to an enabled character.
///
/// The caller is responsible for checking `state.enabled` and for
/// persisting the result.
///
/// # Order of operations
///
/// 1. Look up the level's yield
/// 2. Add it to the current amount
/// 3. Compute capacity from tier and level
/// 4. Extend the overfull streak if at or above capacity
/// 5. Select a warning from the escalation table
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if decimal arithmetic fails.
pub fn apply_production_tick(
    state: &mut CharacterState,
    settings: &Settings,
    character: &CharacterId,
) -> Result<ProductionTick, EconomyError> {
    // 1-2. Accrue
    let produced = yield_per_turn(state.level, settings)?;
    state.current_amount = state
        .current_amount
        .checked_add(produced)
        .ok_or_else(|| EconomyError::overflow("production accrual"))?;

    // 3. Capacity
    let capacity = capacity(state.capacity_tier, state.level)?;

    // 4-5. Escalation
    let mut warning = None;
    if state.current_amount >= capacity {
        state.overfull_streak = state.overfull_streak.saturating_add(1);
        if let Some(level) = warning_for_streak(state.overfull_streak) {
            warn!(
                character = %character,
                streak = state.overfull_streak,
                ?level,
                "Overflow warning"
            );
            warning = Some(OverflowWarning {
                level,
                streak: state.overfull_streak,
                message: warning_message(level, character),
            });
        }
    }

    debug!(
        character = %character,
        %produced,
        amount = %state.current_amount,
        %capacity,
        streak = state.overfull_streak,
        "Production tick"
    );

    Ok(ProductionTick {
        produced,
        capacity,
        warning,
    })
}

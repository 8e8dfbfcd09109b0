//! Level curves: capacity, per-turn yield, and experience requirements.
//!
//! All three are pure functions of `(tier, level)` and the configured
//! [`ProductionMode`]. Levels outside 1--10 are clamped before lookup so
//! a corrupted record can never index past a table.
//!
//! ```text
//! capacity        = base_capacity(tier) * (1 + 0.10 * (level - 1))
//! yield (table)   = LEVEL_YIELD[level]
//! yield (scaled)  = base_yield_per_turn * (1 + 0.05 * (level - 1))
//! ```

use rust_decimal::Decimal;

use reservoir_types::{CapacityTier, MAX_LEVEL, MIN_LEVEL};

use crate::config::{ProductionMode, Settings};
use crate::error::EconomyError;

/// Per-turn yield for levels 1 through 10 under [`ProductionMode::LevelTable`].
pub const LEVEL_YIELD: [u32; 10] = [1, 2, 4, 6, 8, 10, 12, 14, 16, 18];

/// Experience needed to clear levels 1 through 10.
pub const REQUIRED_EXPERIENCE: [u64; 10] =
    [100, 250, 500, 1000, 2000, 4000, 8000, 16000, 32000, 64000];

/// Requirement of the final level.
const FINAL_REQUIREMENT: u64 = 64000;

/// Base capacity of a tier before level scaling.
pub const fn base_capacity(tier: CapacityTier) -> u32 {
    match tier {
        CapacityTier::Small => 200,
        CapacityTier::Medium => 400,
        CapacityTier::Large => 600,
    }
}

/// Clamp a level into the valid 1--10 range.
pub const fn clamp_level(level: u32) -> u32 {
    if level < MIN_LEVEL {
        MIN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}

/// Zero-based table index for a level.
const fn level_index(level: u32) -> usize {
    // clamp_level guarantees 1..=10, so the subtraction cannot wrap.
    #[allow(clippy::arithmetic_side_effects)]
    let index = clamp_level(level) - MIN_LEVEL;
    index as usize
}

/// Capacity at the given tier and level.
///
/// Computed as `base * (9 + level) / 10`, which is exactly
/// `base * (1 + 0.1 * (level - 1))` without floating point.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if decimal arithmetic fails.
pub fn capacity(tier: CapacityTier, level: u32) -> Result<Decimal, EconomyError> {
    let steps = clamp_level(level)
        .checked_add(9)
        .ok_or_else(|| EconomyError::overflow("capacity level steps"))?;
    Decimal::from(base_capacity(tier))
        .checked_mul(Decimal::from(steps))
        .and_then(|v| v.checked_div(Decimal::TEN))
        .ok_or_else(|| EconomyError::overflow("capacity scaling"))
}

/// Amount produced per turn at the given level.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if decimal arithmetic fails.
pub fn yield_per_turn(level: u32, settings: &Settings) -> Result<Decimal, EconomyError> {
    match settings.production_mode {
        ProductionMode::LevelTable => LEVEL_YIELD
            .get(level_index(level))
            .copied()
            .map(Decimal::from)
            .ok_or_else(|| EconomyError::overflow("level yield lookup")),
        ProductionMode::Scaled => {
            // base * (19 + level) / 20 == base * (1 + 0.05 * (level - 1))
            let steps = clamp_level(level)
                .checked_add(19)
                .ok_or_else(|| EconomyError::overflow("yield level steps"))?;
            Decimal::from(settings.base_yield_per_turn)
                .checked_mul(Decimal::from(steps))
                .and_then(|v| v.checked_div(Decimal::from(20)))
                .ok_or_else(|| EconomyError::overflow("yield scaling"))
        }
    }
}

/// Experience required to clear `level`.
///
/// Levels past the table (which cannot occur after clamping) reuse the
/// final entry.
pub fn required_experience(level: u32) -> u64 {
    REQUIRED_EXPERIENCE
        .get(level_index(level))
        .copied()
        .unwrap_or(FINAL_REQUIREMENT)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn base_capacities() {
        assert_eq!(base_capacity(CapacityTier::Small), 200);
        assert_eq!(base_capacity(CapacityTier::Medium), 400);
        assert_eq!(base_capacity(CapacityTier::Large), 600);
    }

    #[test]
    fn capacity_grows_ten_percent_per_level() {
        assert_eq!(capacity(CapacityTier::Medium, 1).ok(), Some(dec!(400)));
        assert_eq!(capacity(CapacityTier::Medium, 2).ok(), Some(dec!(440)));
        assert_eq!(capacity(CapacityTier::Small, 10).ok(), Some(dec!(380)));
        assert_eq!(capacity(CapacityTier::Large, 5).ok(), Some(dec!(840)));
    }

    #[test]
    fn capacity_clamps_corrupt_levels() {
        assert_eq!(capacity(CapacityTier::Medium, 0).ok(), Some(dec!(400)));
        assert_eq!(capacity(CapacityTier::Medium, 99).ok(), Some(dec!(760)));
    }

    #[test]
    fn level_table_yield_is_monotonic() {
        let settings = Settings::default();
        let mut previous = Decimal::ZERO;
        for level in MIN_LEVEL..=MAX_LEVEL {
            let current = yield_per_turn(level, &settings).ok().unwrap_or_default();
            assert!(current > previous, "level {level} yield {current} <= {previous}");
            previous = current;
        }
        assert_eq!(yield_per_turn(1, &settings).ok(), Some(dec!(1)));
        assert_eq!(yield_per_turn(10, &settings).ok(), Some(dec!(18)));
    }

    #[test]
    fn scaled_yield_adds_five_percent_per_level() {
        let settings = Settings {
            production_mode: ProductionMode::Scaled,
            ..Settings::default()
        };
        assert_eq!(yield_per_turn(1, &settings).ok(), Some(dec!(10)));
        assert_eq!(yield_per_turn(2, &settings).ok(), Some(dec!(10.5)));
        assert_eq!(yield_per_turn(10, &settings).ok(), Some(dec!(14.5)));
    }

    #[test]
    fn required_experience_table() {
        let expected = [100, 250, 500, 1000, 2000, 4000, 8000, 16000, 32000, 64000];
        for (level, want) in (MIN_LEVEL..=MAX_LEVEL).zip(expected) {
            assert_eq!(required_experience(level), want, "level {level}");
        }
        assert_eq!(required_experience(42), 64000);
    }
}

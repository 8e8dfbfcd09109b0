//! Experience and leveling.
//!
//! Experience accumulates toward the current level's requirement. Each
//! time the requirement is met it is subtracted and the level rises, until
//! level 10. At level 10 further experience keeps accumulating but never
//! converts into another level.

use reservoir_types::{CharacterState, MAX_LEVEL};
use tracing::info;

use crate::curves::required_experience;
use crate::error::EconomyError;

/// Add experience to a character, applying every level-up it unlocks.
///
/// Returns the number of levels gained.
///
/// # Errors
///
/// Returns [`EconomyError::ArithmeticOverflow`] if the experience counter
/// would overflow.
pub fn add_experience(state: &mut CharacterState, amount: u64) -> Result<u32, EconomyError> {
    state.experience = state
        .experience
        .checked_add(amount)
        .ok_or_else(|| EconomyError::overflow("experience accumulation"))?;

    let mut gained: u32 = 0;
    while state.level < MAX_LEVEL {
        let required = required_experience(state.level);
        if state.experience < required {
            break;
        }
        state.experience = state
            .experience
            .checked_sub(required)
            .ok_or_else(|| EconomyError::overflow("experience carry-over"))?;
        state.level = state
            .level
            .checked_add(1)
            .ok_or_else(|| EconomyError::overflow("level increment"))?;
        gained = gained.saturating_add(1);
        info!(level = state.level, carry = state.experience, "Level up");
    }

    Ok(gained)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_level(level: u32, experience: u64) -> CharacterState {
        CharacterState {
            level,
            experience,
            ..CharacterState::default()
        }
    }

    #[test]
    fn below_requirement_only_accumulates() {
        let mut state = at_level(1, 0);
        let gained = add_experience(&mut state, 99);
        assert_eq!(gained.ok(), Some(0));
        assert_eq!(state.level, 1);
        assert_eq!(state.experience, 99);
    }

    #[test]
    fn exact_requirement_levels_up_with_zero_carry() {
        let mut state = at_level(1, 90);
        let gained = add_experience(&mut state, 10);
        assert_eq!(gained.ok(), Some(1));
        assert_eq!(state.level, 2);
        assert_eq!(state.experience, 0);
    }

    #[test]
    fn large_award_crosses_several_levels() {
        // 100 + 250 + 500 = 850 clears levels 1..=3, leaving 50 at level 4.
        let mut state = at_level(1, 0);
        let gained = add_experience(&mut state, 900);
        assert_eq!(gained.ok(), Some(3));
        assert_eq!(state.level, 4);
        assert_eq!(state.experience, 50);
    }

    #[test]
    fn level_never_exceeds_ten() {
        let mut state = at_level(1, 0);
        let gained = add_experience(&mut state, u64::from(u32::MAX));
        assert!(gained.is_ok());
        assert_eq!(state.level, MAX_LEVEL);
    }

    #[test]
    fn excess_at_max_level_is_retained() {
        let mut state = at_level(MAX_LEVEL, 63_000);
        let gained = add_experience(&mut state, 5_000);
        assert_eq!(gained.ok(), Some(0));
        assert_eq!(state.level, MAX_LEVEL);
        assert_eq!(state.experience, 68_000);
    }

    #[test]
    fn overflowing_counter_is_an_error() {
        let mut state = at_level(MAX_LEVEL, u64::MAX);
        let result = add_experience(&mut state, 1);
        assert!(matches!(result, Err(EconomyError::ArithmeticOverflow { .. })));
    }
}

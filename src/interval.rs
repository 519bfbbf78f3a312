use crate::error::Result;
use crate::review::{ItemScheduleState, MAX_SCORE, check_score};

/// Lower bound for the ease factor.
pub const MIN_EASE_FACTOR: f32 = 1.3;
/// Ease factor assigned to an item on its first review.
pub const INITIAL_EASE_FACTOR: f32 = 2.5;
/// Scores at or above this count as successful recall.
pub(crate) const PASSING_SCORE: u8 = 3;

const FIRST_INTERVAL: u32 = 1;
const SECOND_INTERVAL: u32 = 6;

/// Provisional next interval and updated ease factor, before contextual
/// correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseInterval {
    pub interval: u32,
    pub ease_factor: f32,
}

/// Applies the core update rule to a single new score.
///
/// On successful recall the interval steps through 1 day, then 6 days, then
/// grows by the ease factor; the ease factor moves by
/// `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`. On failed recall the interval
/// resets to 1 day and the ease factor drops by 0.2. Either way the ease
/// factor never ends below [`MIN_EASE_FACTOR`] and the interval never below
/// one day.
pub fn next_base_interval(state: &ItemScheduleState) -> Result<BaseInterval> {
    check_score(state.last_score)?;

    if state.last_score >= PASSING_SCORE {
        let interval = match state.repetition {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => (state.interval as f32 * state.ease_factor).round().max(1.0) as u32,
        };
        let miss = (MAX_SCORE - state.last_score) as f32;
        let ease_factor =
            (state.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);
        Ok(BaseInterval {
            interval,
            ease_factor,
        })
    } else {
        Ok(BaseInterval {
            interval: FIRST_INTERVAL,
            ease_factor: (state.ease_factor - 0.2).max(MIN_EASE_FACTOR),
        })
    }
}

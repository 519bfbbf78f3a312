use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{AdjustmentFactor, contextual_modifiers};
use crate::error::Result;
use crate::interval::{PASSING_SCORE, next_base_interval};
use crate::review::{ItemScheduleState, ReviewEvent, SessionSummary};

const CONFIDENCE_FLOOR: f32 = 0.5;
const CONFIDENCE_PER_SAMPLE: f32 = 0.05;
/// Hard cap on the confidence level regardless of sample volume.
const CONFIDENCE_CAP: f32 = 0.95;

/// The engine's full recommendation for one item. Serialized as-is by the
/// persistence collaborator; [`ItemScheduleState::apply`] turns it into the
/// replacement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Days until the next review, after contextual correction. Always >= 1.
    pub recommended_interval: u32,
    pub ease_factor: f32,
    pub repetition: u32,
    /// Estimated recall probability at the next review date. Informational;
    /// it does not feed back into the interval.
    pub retention_probability: f32,
    pub confidence_level: f32,
    /// Correction factors that deviated from 1.00.
    pub adjustment_reason: Vec<AdjustmentFactor>,
    pub next_review_date: DateTime<Utc>,
}

/// Forgetting-curve approximation `exp(-interval / (ease_factor * 10))`.
/// Within (0, 1] for every valid interval and ease factor.
pub fn retention_probability(interval: u32, ease_factor: f32) -> f32 {
    (-(interval as f32) / (ease_factor * 10.0)).exp()
}

/// Confidence from the amount of historical data behind a recommendation:
/// 0.5 at zero samples, +0.05 per sample, capped at 0.95.
pub fn confidence_level(samples: usize) -> f32 {
    (CONFIDENCE_FLOOR + samples as f32 * CONFIDENCE_PER_SAMPLE).min(CONFIDENCE_CAP)
}

/// Computes one scheduling recommendation from the supplied state and
/// context. Pure: identical arguments (including `now`) produce bit-identical
/// results, and errors are returned before anything observable happens.
///
/// `now` carries the learner's timezone; the time-of-day window is read from
/// its local hour, while the returned review date is normalized to UTC.
pub fn compute_schedule<Tz: TimeZone>(
    state: &ItemScheduleState,
    history: &[ReviewEvent],
    sessions: &[SessionSummary],
    now: &DateTime<Tz>,
) -> Result<OptimizationResult> {
    let base = next_base_interval(state)?;
    let modifiers = contextual_modifiers(now.hour(), sessions, history)?;

    let recommended_interval =
        (base.interval as f32 * modifiers.combined()).round().max(1.0) as u32;
    let repetition = if state.last_score >= PASSING_SCORE {
        state.repetition + 1
    } else {
        0
    };

    Ok(OptimizationResult {
        recommended_interval,
        ease_factor: base.ease_factor,
        repetition,
        retention_probability: retention_probability(recommended_interval, base.ease_factor),
        confidence_level: confidence_level(history.len() + sessions.len()),
        adjustment_reason: modifiers.applied(),
        next_review_date: now.with_timezone(&Utc) + Duration::days(recommended_interval as i64),
    })
}

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Result;
use crate::review::{ReviewEvent, SessionSummary, check_score};

/// Mean quality weight assumed when no session history is available.
const DEFAULT_SESSION_QUALITY: f32 = 0.7;

/// Correction factors that fired for a recommendation, recorded for
/// explainability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdjustmentFactor {
    TimeOfDay,
    SessionQuality,
    PerformanceTrend,
}

/// The three independent correction multipliers derived from supplied
/// context. Combined multiplicatively; the floor of one day is enforced
/// after rounding, downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextModifiers {
    pub time_of_day: f32,
    pub session_quality: f32,
    pub performance_trend: f32,
}

impl ContextModifiers {
    pub fn combined(&self) -> f32 {
        self.time_of_day * self.session_quality * self.performance_trend
    }

    /// Labels of every multiplier that deviates from 1.00, in a fixed order.
    pub fn applied(&self) -> Vec<AdjustmentFactor> {
        let mut applied = Vec::new();
        if self.time_of_day != 1.0 {
            applied.push(AdjustmentFactor::TimeOfDay);
        }
        if self.session_quality != 1.0 {
            applied.push(AdjustmentFactor::SessionQuality);
        }
        if self.performance_trend != 1.0 {
            applied.push(AdjustmentFactor::PerformanceTrend);
        }
        applied
    }
}

/// Hour-of-day correction, inclusive windows on the learner's local clock.
pub fn time_of_day_multiplier(hour: u32) -> f32 {
    match hour {
        9..=11 => 1.10,
        14..=16 => 1.05,
        19..=21 => 0.95,
        _ => 1.00,
    }
}

pub fn session_quality_multiplier(sessions: &[SessionSummary]) -> f32 {
    let average = if sessions.is_empty() {
        DEFAULT_SESSION_QUALITY
    } else {
        sessions.iter().map(|s| s.quality.weight()).sum::<f32>() / sessions.len() as f32
    };
    if average > 0.8 {
        1.10
    } else if average < 0.6 {
        0.90
    } else {
        1.00
    }
}

/// Correction from the mean of the 0-5 scores across the supplied history.
/// An out-of-range score in the history is rejected rather than averaged in.
pub fn performance_trend_multiplier(history: &[ReviewEvent]) -> Result<f32> {
    if history.is_empty() {
        return Ok(1.00);
    }
    for event in history {
        check_score(event.score)?;
    }
    let average = history.iter().map(|e| e.score as f32).sum::<f32>() / history.len() as f32;
    Ok(if average > 4.0 {
        1.15
    } else if average < 3.0 {
        0.85
    } else {
        1.00
    })
}

pub fn contextual_modifiers(
    hour: u32,
    sessions: &[SessionSummary],
    history: &[ReviewEvent],
) -> Result<ContextModifiers> {
    Ok(ContextModifiers {
        time_of_day: time_of_day_multiplier(hour),
        session_quality: session_quality_multiplier(sessions),
        performance_trend: performance_trend_multiplier(history)?,
    })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, SchedulerError};
use crate::interval::INITIAL_EASE_FACTOR;
use crate::schedule::OptimizationResult;

/// Highest valid recall score. Scores of 3 and above count as successful
/// recall; anything above this bound is rejected, never clamped.
pub const MAX_SCORE: u8 = 5;

pub(crate) fn check_score(score: u8) -> Result<()> {
    if score > MAX_SCORE {
        return Err(SchedulerError::InvalidScore);
    }
    Ok(())
}

/// Per-item scheduling state. Mutated only by applying an
/// [`OptimizationResult`]; the engine itself never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScheduleState {
    pub ease_factor: f32,
    /// Days until the next scheduled review.
    pub interval: u32,
    /// Consecutive successful recalls.
    pub repetition: u32,
    /// Score of the most recent recall attempt, 0-5.
    pub last_score: u8,
}

impl Default for ItemScheduleState {
    /// State of an item at its first review.
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetition: 0,
            last_score: 0,
        }
    }
}

impl ItemScheduleState {
    /// Replaces this state with the one recommended by `result`. The last
    /// score is left for the next recall attempt to set.
    pub fn apply(&mut self, result: &OptimizationResult) {
        self.ease_factor = result.ease_factor;
        self.interval = result.recommended_interval;
        self.repetition = result.repetition;
    }
}

/// A single recall attempt, supplied by the history collaborator in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub item_id: String,
    /// 0-5
    pub score: u8,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub quality: SessionQuality,
    pub timestamp: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionQuality {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl SessionQuality {
    /// Pre-normalized effectiveness weight in [0, 1].
    pub fn weight(self) -> f32 {
        match self {
            SessionQuality::Excellent => 1.0,
            SessionQuality::Good => 0.8,
            SessionQuality::NeedsImprovement => 0.4,
            SessionQuality::Poor => 0.2,
        }
    }
}

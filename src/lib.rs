mod batch;
mod context;
mod error;
mod interval;
mod review;
mod schedule;

pub use batch::{
    BatchConfig, BatchProgress, ItemOutcome, ItemResult, ScheduleStore, ScheduleUpdatedFn,
    optimize_batch,
};
pub use context::{
    AdjustmentFactor, ContextModifiers, contextual_modifiers, performance_trend_multiplier,
    session_quality_multiplier, time_of_day_multiplier,
};
pub use error::{Result, SchedulerError};
pub use interval::{
    BaseInterval, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR, next_base_interval,
};
pub use review::{
    ItemScheduleState, MAX_SCORE, ReviewEvent, SessionQuality, SessionSummary,
};
pub use schedule::{
    OptimizationResult, compute_schedule, confidence_level, retention_probability,
};

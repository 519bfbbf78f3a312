use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone};
use log::debug;
use rayon::prelude::*;

use crate::error::{Result, SchedulerError};
use crate::review::{ItemScheduleState, ReviewEvent, SessionSummary};
use crate::schedule::{OptimizationResult, compute_schedule};

/// The external history and persistence collaborators, scoped to one
/// learner.
///
/// `schedule_state` returning `Ok(None)` marks a first-time item: the
/// optimizer schedules it from [`ItemScheduleState::default`] rather than
/// failing. Read errors map to `HistoryUnavailable`. `persist_schedule` uses
/// optimistic concurrency: a write that lost against a concurrent update
/// returns `PersistenceConflict` (retried with fresh reads), any other write
/// error returns `PersistenceFailure`.
pub trait ScheduleStore {
    fn schedule_state(&self, item_id: &str) -> Result<Option<ItemScheduleState>>;
    fn review_history(&self, item_id: &str) -> Result<Vec<ReviewEvent>>;
    fn recent_session_summaries(&self, limit: usize) -> Result<Vec<SessionSummary>>;
    fn persist_schedule(&self, item_id: &str, result: &OptimizationResult) -> Result<()>;
}

/// Called once per item whose schedule was persisted. Caching layers that
/// previously hooked into the optimizer subscribe here instead.
#[derive(Clone)]
pub struct ScheduleUpdatedFn(pub Arc<dyn Fn(&str, &OptimizationResult) + Sync + Send>);

impl PartialEq for ScheduleUpdatedFn {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl fmt::Debug for ScheduleUpdatedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrap(<function>)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Upper bound on concurrently in-flight items.
    pub max_in_flight: usize,
    /// Full read-compute-persist attempts replayed after a
    /// `PersistenceConflict` before the item is surfaced as failed.
    pub conflict_retries: usize,
    /// How many recent session summaries to request per item.
    pub session_window: usize,
    pub schedule_updated_fn: Option<ScheduleUpdatedFn>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            conflict_retries: 3,
            session_window: 10,
            schedule_updated_fn: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchProgress {
    pub items_processed: usize,
    pub items_total: usize,
    /// Cooperative cancellation: in-flight items run to completion, items
    /// not yet started are reported as `Interrupted`.
    pub want_abort: bool,
}

impl BatchProgress {
    pub fn new_shared() -> Arc<Mutex<Self>> {
        Default::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Applied(OptimizationResult),
    Failed(SchedulerError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub item_id: String,
    pub outcome: ItemOutcome,
}

/// Recomputes and persists the schedule of every item in `item_ids`,
/// independently. One outcome is returned per requested item, in input
/// order; a failing step for one item never affects the others.
pub fn optimize_batch<S, Tz>(
    config: &BatchConfig,
    store: &S,
    item_ids: &[String],
    now: &DateTime<Tz>,
    progress: Option<Arc<Mutex<BatchProgress>>>,
) -> Vec<ItemResult>
where
    S: ScheduleStore + Sync,
    Tz: TimeZone,
    Tz::Offset: Sync,
{
    if let Some(progress) = &progress {
        let mut info = progress.lock().unwrap();
        info.items_processed = 0;
        info.items_total = item_ids.len();
    }

    let mut results = Vec::with_capacity(item_ids.len());
    for chunk in item_ids.chunks(config.max_in_flight.max(1)) {
        let aborted = progress
            .as_ref()
            .is_some_and(|p| p.lock().unwrap().want_abort);
        if aborted {
            debug!(
                "batch aborted, {} items not started",
                item_ids.len() - results.len()
            );
            results.extend(chunk.iter().map(|item_id| ItemResult {
                item_id: item_id.clone(),
                outcome: ItemOutcome::Failed(SchedulerError::Interrupted),
            }));
            continue;
        }

        let chunk_results: Vec<ItemResult> = chunk
            .par_iter()
            .map(|item_id| optimize_item(config, store, item_id, now))
            .collect();
        if let Some(progress) = &progress {
            progress.lock().unwrap().items_processed += chunk.len();
        }
        results.extend(chunk_results);
    }
    results
}

fn optimize_item<S, Tz>(
    config: &BatchConfig,
    store: &S,
    item_id: &str,
    now: &DateTime<Tz>,
) -> ItemResult
where
    S: ScheduleStore,
    Tz: TimeZone,
{
    let mut attempts = 0;
    let outcome = loop {
        match optimize_once(config, store, item_id, now) {
            Err(SchedulerError::PersistenceConflict) if attempts < config.conflict_retries => {
                attempts += 1;
                debug!("persistence conflict on {item_id}, retry {attempts}");
            }
            Ok(result) => break ItemOutcome::Applied(result),
            Err(err) => break ItemOutcome::Failed(err),
        }
    };
    ItemResult {
        item_id: item_id.to_string(),
        outcome,
    }
}

/// One full read-compute-persist pass. A conflict invalidates the reads, so
/// the caller restarts from fresh ones.
fn optimize_once<S, Tz>(
    config: &BatchConfig,
    store: &S,
    item_id: &str,
    now: &DateTime<Tz>,
) -> Result<OptimizationResult>
where
    S: ScheduleStore,
    Tz: TimeZone,
{
    let state = store.schedule_state(item_id)?.unwrap_or_default();
    let history = store.review_history(item_id)?;
    let sessions = store.recent_session_summaries(config.session_window)?;
    let result = compute_schedule(&state, &history, &sessions, now)?;
    store.persist_schedule(item_id, &result)?;
    if let Some(ScheduleUpdatedFn(notify)) = &config.schedule_updated_fn {
        notify(item_id, &result);
    }
    Ok(result)
}

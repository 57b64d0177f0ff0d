//! Engine entry points: occurrence regeneration, conflict validation, and
//! the scheduling pass.
//!
//! A pass is a pure function of the store contents plus `today` — the engine
//! never reads the system clock and keeps no state between invocations.
//! Passes mutate the store in sequential read-then-write stages with no
//! isolation between them: an interrupted pass may leave intervals partially
//! regenerated, and the remedy is to re-run the whole pass. Callers must not
//! run two passes concurrently against the same store.

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::assign::assign_intervals;
use crate::error::{EngineError, Result};
use crate::expander::{expand_recurrence, DayWindow};
use crate::model::{BucketOccurrence, EventOccurrence, MasterEvent, TaskBucket, TaskInterval};
use crate::ordering::{order_tasks, ZeroScoring};
use crate::overlap::{check_overlap, OverlapInfo, OverlapKind};
use crate::slots::compute_free_slots;
use crate::store::PlanStore;

/// Knobs for expansion and assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How far past `today` occurrences are generated.
    pub horizon_months: u32,
    /// Smallest partial interval a breakable task may be split into.
    pub min_chunk_minutes: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_months: 3,
            min_chunk_minutes: 15,
        }
    }
}

/// What one scheduling pass did. A task id under `unassigned_task_ids`
/// received zero intervals this cycle — that is an outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub manual_committed: usize,
    pub assigned_task_ids: Vec<i64>,
    pub unassigned_task_ids: Vec<i64>,
    pub intervals_created: usize,
}

/// Replace an event's occurrences with a fresh expansion of its master.
///
/// Delete-all-then-recreate: the old derived rows are dropped and the master
/// is re-expanded over `[today, today + horizon]`. Call after every create
/// or edit of the master so no stale or duplicate occurrences survive.
pub fn regenerate_event_occurrences<S: PlanStore + ?Sized>(
    store: &mut S,
    event_id: i64,
    today: NaiveDate,
    horizon_months: u32,
) -> Result<Vec<EventOccurrence>> {
    let event = store.event(event_id)?.ok_or(EngineError::NotFound {
        entity: "event",
        id: event_id,
    })?;
    store.delete_event_occurrences_for(event_id)?;

    let windows = expand_recurrence(
        &event.recurrence,
        event.start_date,
        event.end_date,
        event.start_time,
        event.end_time,
        today,
        horizon_months,
    );
    debug!(event_id, occurrences = windows.len(), "regenerating event occurrences");

    let mut rows = Vec::with_capacity(windows.len());
    for window in windows {
        let occurrence = EventOccurrence {
            id: 0,
            event_id,
            date: window.date,
            start_time: window.start_time,
            end_time: window.end_time,
            is_exception: false,
        };
        let id = store.insert_event_occurrence(occurrence.clone())?;
        rows.push(EventOccurrence { id, ..occurrence });
    }
    Ok(rows)
}

/// Replace a bucket's occurrences with a fresh expansion of its master.
/// Semantics match [`regenerate_event_occurrences`].
pub fn regenerate_bucket_occurrences<S: PlanStore + ?Sized>(
    store: &mut S,
    bucket_id: i64,
    today: NaiveDate,
    horizon_months: u32,
) -> Result<Vec<BucketOccurrence>> {
    let bucket = store.bucket(bucket_id)?.ok_or(EngineError::NotFound {
        entity: "bucket",
        id: bucket_id,
    })?;
    store.delete_bucket_occurrences_for(bucket_id)?;

    let windows = expand_recurrence(
        &bucket.recurrence,
        bucket.start_date,
        bucket.end_date,
        bucket.start_time,
        bucket.end_time,
        today,
        horizon_months,
    );
    debug!(bucket_id, occurrences = windows.len(), "regenerating bucket occurrences");

    let mut rows = Vec::with_capacity(windows.len());
    for window in windows {
        let occurrence = BucketOccurrence {
            id: 0,
            bucket_id,
            date: window.date,
            start_time: window.start_time,
            end_time: window.end_time,
            is_exception: false,
        };
        let id = store.insert_bucket_occurrence(occurrence.clone())?;
        rows.push(BucketOccurrence { id, ..occurrence });
    }
    Ok(rows)
}

fn event_windows<S: PlanStore + ?Sized>(store: &S, exclude_event_id: i64) -> Result<Vec<DayWindow>> {
    Ok(store
        .event_occurrences()?
        .into_iter()
        .filter(|o| o.event_id != exclude_event_id)
        .map(|o| DayWindow {
            date: o.date,
            start_time: o.start_time,
            end_time: o.end_time,
        })
        .collect())
}

fn bucket_windows<S: PlanStore + ?Sized>(
    store: &S,
    exclude_bucket_id: i64,
) -> Result<Vec<DayWindow>> {
    Ok(store
        .bucket_occurrences()?
        .into_iter()
        .filter(|o| o.bucket_id != exclude_bucket_id)
        .map(|o| DayWindow {
            date: o.date,
            start_time: o.start_time,
            end_time: o.end_time,
        })
        .collect())
}

/// Validate a proposed (possibly unsaved) event against the store: first
/// against other events' occurrences, then against bucket occurrences. The
/// candidate's own occurrences are excluded so edits can re-validate.
pub fn check_event_conflicts<S: PlanStore + ?Sized>(
    store: &S,
    candidate: &MasterEvent,
    today: NaiveDate,
    horizon_months: u32,
) -> Result<OverlapInfo> {
    let against_events = check_overlap(
        &candidate.recurrence,
        candidate.start_date,
        candidate.end_date,
        candidate.start_time,
        candidate.end_time,
        today,
        horizon_months,
        &event_windows(store, candidate.id)?,
        OverlapKind::Event,
    );
    if against_events.has_overlap {
        return Ok(against_events);
    }
    Ok(check_overlap(
        &candidate.recurrence,
        candidate.start_date,
        candidate.end_date,
        candidate.start_time,
        candidate.end_time,
        today,
        horizon_months,
        &bucket_windows(store, 0)?,
        OverlapKind::Bucket,
    ))
}

/// Validate a proposed (possibly unsaved) bucket against the store: first
/// against other buckets' occurrences, then against event occurrences.
pub fn check_bucket_conflicts<S: PlanStore + ?Sized>(
    store: &S,
    candidate: &TaskBucket,
    today: NaiveDate,
    horizon_months: u32,
) -> Result<OverlapInfo> {
    let against_buckets = check_overlap(
        &candidate.recurrence,
        candidate.start_date,
        candidate.end_date,
        candidate.start_time,
        candidate.end_time,
        today,
        horizon_months,
        &bucket_windows(store, candidate.id)?,
        OverlapKind::Bucket,
    );
    if against_buckets.has_overlap {
        return Ok(against_buckets);
    }
    Ok(check_overlap(
        &candidate.recurrence,
        candidate.start_date,
        candidate.end_date,
        candidate.start_time,
        candidate.end_time,
        today,
        horizon_months,
        &event_windows(store, 0)?,
        OverlapKind::Event,
    ))
}

/// Run one full scheduling pass.
///
/// Stages, in order: clear every previously generated interval; split tasks
/// into manual (pinned date and time) and auto; commit each manual task as a
/// single interval; compute free slots from bucket occurrences minus the
/// manual intervals; order the auto tasks; assign them into the slots and
/// persist the result.
///
/// Call after any task, deadline, category, or bucket mutation that could
/// affect auto-assignment. Two passes must never run concurrently against
/// the same store.
pub fn run_scheduling_pass<S: PlanStore + ?Sized>(
    store: &mut S,
    today: NaiveDate,
    config: &SchedulerConfig,
) -> Result<PassSummary> {
    store.delete_all_task_intervals()?;

    let (manual, auto): (Vec<_>, Vec<_>) =
        store.tasks()?.into_iter().partition(|t| t.is_manual());
    debug!(manual = manual.len(), auto = auto.len(), "scheduling pass started");

    let mut manual_intervals = Vec::with_capacity(manual.len());
    for task in &manual {
        let (Some(date), Some(start_time)) = (task.start_date, task.start_time) else {
            continue;
        };
        let interval = TaskInterval {
            id: 0,
            task_id: task.id,
            interval_no: 1,
            date,
            start_time,
            end_time: start_time + Duration::minutes(task.predicted_minutes),
        };
        let id = store.insert_task_interval(interval.clone())?;
        manual_intervals.push(TaskInterval { id, ..interval });
    }

    let bucket_occurrences = store.bucket_occurrences()?;
    let mut slots = compute_free_slots(&bucket_occurrences, &manual_intervals);
    debug!(slots = slots.len(), "computed free slots");

    let deadlines = store.deadlines()?;
    let mut ordered = order_tasks(&auto, &deadlines, today, &ZeroScoring);

    let created = assign_intervals(&mut ordered, &mut slots, config.min_chunk_minutes);
    for interval in &created {
        store.insert_task_interval(interval.clone())?;
    }

    let mut assigned_task_ids: Vec<i64> = created.iter().map(|i| i.task_id).collect();
    assigned_task_ids.sort_unstable();
    assigned_task_ids.dedup();
    let unassigned_task_ids: Vec<i64> = auto
        .iter()
        .map(|t| t.id)
        .filter(|id| !assigned_task_ids.contains(id))
        .collect();

    let summary = PassSummary {
        manual_committed: manual_intervals.len(),
        assigned_task_ids,
        unassigned_task_ids,
        intervals_created: manual_intervals.len() + created.len(),
    };
    info!(
        manual = summary.manual_committed,
        assigned = summary.assigned_task_ids.len(),
        unassigned = summary.unassigned_task_ids.len(),
        intervals = summary.intervals_created,
        "scheduling pass finished"
    );
    Ok(summary)
}

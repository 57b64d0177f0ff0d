//! Tests for the engine entry points against the in-memory store.

use chrono::{NaiveDate, NaiveTime};
use daybook_engine::model::{
    Deadline, MasterEvent, RecurrenceSpec, Task, TaskBucket, TaskInterval,
};
use daybook_engine::{
    check_bucket_conflicts, check_event_conflicts, regenerate_bucket_occurrences,
    regenerate_event_occurrences, run_scheduling_pass, EngineError, MemoryStore, OverlapKind,
    PlanStore, SchedulerConfig,
};

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn today() -> NaiveDate {
    d(2026, 3, 2)
}

fn event(title: &str, spec: RecurrenceSpec, start: NaiveTime, end: NaiveTime) -> MasterEvent {
    MasterEvent {
        id: 0,
        title: title.to_string(),
        category_id: None,
        start_date: today(),
        end_date: Some(d(2026, 3, 8)),
        start_time: start,
        end_time: end,
        recurrence: spec,
    }
}

fn bucket(title: &str, spec: RecurrenceSpec, start: NaiveTime, end: NaiveTime) -> TaskBucket {
    TaskBucket {
        id: 0,
        title: title.to_string(),
        start_date: today(),
        end_date: Some(d(2026, 3, 8)),
        start_time: start,
        end_time: end,
        recurrence: spec,
    }
}

fn auto_task(title: &str, priority: u8, minutes: i64) -> Task {
    Task {
        id: 0,
        title: title.to_string(),
        priority,
        breakable: false,
        start_date: None,
        start_time: None,
        predicted_minutes: minutes,
        deadline_id: None,
        dependency_task_id: None,
        category_id: None,
    }
}

// ---------------------------------------------------------------------------
// Occurrence regeneration
// ---------------------------------------------------------------------------

#[test]
fn regenerate_creates_one_row_per_expanded_date() {
    let mut store = MemoryStore::new();
    let event_id = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(9, 15)))
        .unwrap();

    let rows = regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();

    assert_eq!(rows.len(), 7, "Mar 2 through Mar 8");
    assert!(rows.iter().all(|o| o.event_id == event_id && !o.is_exception));
    assert_eq!(store.event_occurrences_for(event_id).unwrap().len(), 7);
}

#[test]
fn regenerate_replaces_rather_than_appends() {
    let mut store = MemoryStore::new();
    let event_id = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(9, 15)))
        .unwrap();

    regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();
    regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();

    assert_eq!(
        store.event_occurrences_for(event_id).unwrap().len(),
        7,
        "second regeneration must not duplicate rows"
    );
}

#[test]
fn regenerate_unknown_event_is_not_found() {
    let mut store = MemoryStore::new();

    let err = regenerate_event_occurrences(&mut store, 7, today(), 3).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { id: 7, .. }));
}

#[test]
fn regenerate_only_touches_the_given_master() {
    let mut store = MemoryStore::new();
    let first = store
        .insert_bucket(bucket("mornings", RecurrenceSpec::daily(), t(9, 0), t(12, 0)))
        .unwrap();
    let second = store
        .insert_bucket(bucket("evenings", RecurrenceSpec::daily(), t(19, 0), t(21, 0)))
        .unwrap();

    regenerate_bucket_occurrences(&mut store, first, today(), 3).unwrap();
    regenerate_bucket_occurrences(&mut store, second, today(), 3).unwrap();
    regenerate_bucket_occurrences(&mut store, first, today(), 3).unwrap();

    assert_eq!(store.bucket_occurrences_for(second).unwrap().len(), 7);
}

// ---------------------------------------------------------------------------
// Conflict validation
// ---------------------------------------------------------------------------

#[test]
fn event_candidate_conflicts_with_an_existing_event() {
    let mut store = MemoryStore::new();
    let existing = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(10, 0)))
        .unwrap();
    regenerate_event_occurrences(&mut store, existing, today(), 3).unwrap();

    let candidate = event("retro", RecurrenceSpec::weekly([1]), t(9, 30), t(10, 30));
    let info = check_event_conflicts(&store, &candidate, today(), 3).unwrap();

    assert!(info.has_overlap);
    assert_eq!(info.kind, Some(OverlapKind::Event));
    assert_eq!(info.date, Some(d(2026, 3, 2)));
}

#[test]
fn event_candidate_falls_through_to_bucket_conflicts() {
    let mut store = MemoryStore::new();
    let bucket_id = store
        .insert_bucket(bucket("mornings", RecurrenceSpec::daily(), t(9, 0), t(12, 0)))
        .unwrap();
    regenerate_bucket_occurrences(&mut store, bucket_id, today(), 3).unwrap();

    let candidate = event("retro", RecurrenceSpec::weekly([1]), t(9, 30), t(10, 30));
    let info = check_event_conflicts(&store, &candidate, today(), 3).unwrap();

    assert!(info.has_overlap);
    assert_eq!(info.kind, Some(OverlapKind::Bucket));
}

#[test]
fn editing_an_event_does_not_conflict_with_itself() {
    let mut store = MemoryStore::new();
    let event_id = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(10, 0)))
        .unwrap();
    regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();

    let mut edited = store.event(event_id).unwrap().unwrap();
    edited.start_time = t(9, 30);
    edited.end_time = t(10, 30);

    let info = check_event_conflicts(&store, &edited, today(), 3).unwrap();
    assert!(!info.has_overlap, "own occurrences are excluded");
}

#[test]
fn bucket_candidate_checks_buckets_then_events() {
    let mut store = MemoryStore::new();
    let event_id = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(10, 0)))
        .unwrap();
    regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();

    let candidate = bucket("mornings", RecurrenceSpec::daily(), t(9, 30), t(12, 0));
    let info = check_bucket_conflicts(&store, &candidate, today(), 3).unwrap();

    assert!(info.has_overlap);
    assert_eq!(info.kind, Some(OverlapKind::Event));
}

#[test]
fn disjoint_candidate_reports_no_conflict() {
    let mut store = MemoryStore::new();
    let event_id = store
        .insert_event(event("standup", RecurrenceSpec::daily(), t(9, 0), t(10, 0)))
        .unwrap();
    regenerate_event_occurrences(&mut store, event_id, today(), 3).unwrap();

    let candidate = event("lunch", RecurrenceSpec::daily(), t(12, 0), t(13, 0));
    let info = check_event_conflicts(&store, &candidate, today(), 3).unwrap();

    assert!(!info.has_overlap);
}

// ---------------------------------------------------------------------------
// The scheduling pass
// ---------------------------------------------------------------------------

fn store_with_one_bucket_day() -> (MemoryStore, i64) {
    // One bucket occurrence on today only: 09:00-12:00.
    let mut store = MemoryStore::new();
    let mut one_day = bucket("focus", RecurrenceSpec::daily(), t(9, 0), t(12, 0));
    one_day.end_date = Some(today());
    let bucket_id = store.insert_bucket(one_day).unwrap();
    regenerate_bucket_occurrences(&mut store, bucket_id, today(), 3).unwrap();
    (store, bucket_id)
}

#[test]
fn pass_clears_previous_intervals_before_assigning() {
    let (mut store, _) = store_with_one_bucket_day();
    store
        .insert_task_interval(TaskInterval {
            id: 0,
            task_id: 999,
            interval_no: 1,
            date: today(),
            start_time: t(9, 0),
            end_time: t(10, 0),
        })
        .unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    assert!(
        store.intervals_for_task(999).unwrap().is_empty(),
        "stale intervals must not survive a pass"
    );
}

#[test]
fn manual_task_is_committed_as_a_single_pinned_interval() {
    let (mut store, _) = store_with_one_bucket_day();
    let mut pinned = auto_task("dentist", 1, 45);
    pinned.start_date = Some(today());
    pinned.start_time = Some(t(10, 0));
    let task_id = store.insert_task(pinned).unwrap();

    let summary = run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    assert_eq!(summary.manual_committed, 1);
    let intervals = store.intervals_for_task(task_id).unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].interval_no, 1);
    assert_eq!(intervals[0].start_time, t(10, 0));
    assert_eq!(intervals[0].end_time, t(10, 45));
}

#[test]
fn auto_tasks_fill_the_slots_around_manual_ones() {
    let (mut store, _) = store_with_one_bucket_day();
    let mut pinned = auto_task("dentist", 1, 30);
    pinned.start_date = Some(today());
    pinned.start_time = Some(t(10, 0));
    store.insert_task(pinned).unwrap();
    let auto_id = store.insert_task(auto_task("write report", 2, 60)).unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    // Free slots are 09:00-10:00 and 10:30-12:00; the 60-minute task fits
    // the first one exactly.
    let intervals = store.intervals_for_task(auto_id).unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start_time, t(9, 0));
    assert_eq!(intervals[0].end_time, t(10, 0));
}

#[test]
fn fully_assigned_task_gets_exactly_its_predicted_minutes() {
    let (mut store, _) = store_with_one_bucket_day();
    let task_id = store.insert_task(auto_task("deep work", 1, 100)).unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    let total: i64 = store
        .intervals_for_task(task_id)
        .unwrap()
        .iter()
        .map(|i| i.duration_minutes())
        .sum();
    assert_eq!(total, 100);
}

#[test]
fn higher_priority_task_claims_the_earlier_slot() {
    let (mut store, _) = store_with_one_bucket_day();
    let low = store.insert_task(auto_task("low", 4, 60)).unwrap();
    let high = store.insert_task(auto_task("high", 1, 60)).unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    let high_start = store.intervals_for_task(high).unwrap()[0].start_time;
    let low_start = store.intervals_for_task(low).unwrap()[0].start_time;
    assert!(high_start < low_start);
}

#[test]
fn deadline_urgency_orders_equal_priorities() {
    let (mut store, _) = store_with_one_bucket_day();
    let soon = store
        .insert_deadline(Deadline {
            id: 0,
            title: "submission".to_string(),
            date: d(2026, 3, 4),
        })
        .unwrap();
    let later = store
        .insert_deadline(Deadline {
            id: 0,
            title: "review".to_string(),
            date: d(2026, 4, 1),
        })
        .unwrap();

    let mut relaxed = auto_task("relaxed", 2, 60);
    relaxed.deadline_id = Some(later);
    let relaxed_id = store.insert_task(relaxed).unwrap();
    let mut urgent = auto_task("urgent", 2, 60);
    urgent.deadline_id = Some(soon);
    let urgent_id = store.insert_task(urgent).unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    let urgent_start = store.intervals_for_task(urgent_id).unwrap()[0].start_time;
    let relaxed_start = store.intervals_for_task(relaxed_id).unwrap()[0].start_time;
    assert!(urgent_start < relaxed_start);
}

#[test]
fn unschedulable_task_ends_the_pass_with_zero_intervals() {
    let (mut store, _) = store_with_one_bucket_day();
    let too_big = store.insert_task(auto_task("thesis", 1, 600)).unwrap();
    let fits = store.insert_task(auto_task("email", 2, 30)).unwrap();

    let summary = run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    assert!(store.intervals_for_task(too_big).unwrap().is_empty());
    assert_eq!(summary.unassigned_task_ids, vec![too_big]);
    assert_eq!(summary.assigned_task_ids, vec![fits]);
}

#[test]
fn breakable_task_spreads_over_the_remaining_slots() {
    let (mut store, _) = store_with_one_bucket_day();
    let mut pinned = auto_task("dentist", 1, 60);
    pinned.start_date = Some(today());
    pinned.start_time = Some(t(10, 0));
    store.insert_task(pinned).unwrap();

    let mut spread = auto_task("study", 2, 90);
    spread.breakable = true;
    let spread_id = store.insert_task(spread).unwrap();

    run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();

    // Slots 09:00-10:00 (60) and 11:00-12:00 (60): a 60-minute partial then
    // the final 30 minutes.
    let intervals = store.intervals_for_task(spread_id).unwrap();
    assert_eq!(intervals.len(), 2);
    assert_eq!(intervals[0].duration_minutes(), 60);
    assert_eq!(intervals[1].duration_minutes(), 30);
    assert_eq!(intervals[1].start_time, t(11, 0));
}

#[test]
fn rerunning_a_pass_is_idempotent_for_unchanged_inputs() {
    let (mut store, _) = store_with_one_bucket_day();
    store.insert_task(auto_task("write report", 2, 60)).unwrap();

    let first = run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();
    let first_intervals: Vec<_> = store
        .task_intervals()
        .unwrap()
        .into_iter()
        .map(|i| (i.task_id, i.interval_no, i.date, i.start_time, i.end_time))
        .collect();

    let second = run_scheduling_pass(&mut store, today(), &SchedulerConfig::default()).unwrap();
    let second_intervals: Vec<_> = store
        .task_intervals()
        .unwrap()
        .into_iter()
        .map(|i| (i.task_id, i.interval_no, i.date, i.start_time, i.end_time))
        .collect();

    assert_eq!(first, second);
    assert_eq!(first_intervals, second_intervals);
}

//! Persisted entities and recurrence types.
//!
//! Masters (events, buckets) own a [`RecurrenceSpec`]; their occurrences are
//! derived rows, bulk-deleted and regenerated whenever the master changes.
//! Ids are `i64` values assigned by the store on insert; an id of `0` marks a
//! row that has not been persisted yet.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// How often a master item repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    /// A single occurrence on the start date; never repeats.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Frequency-specific constraints for a recurrence.
///
/// Each field is read only under its matching frequency: `weekdays` for
/// [`Frequency::Weekly`], `month_days` for [`Frequency::Monthly`], `year_day`
/// for [`Frequency::Yearly`]. Fields irrelevant to the active frequency are
/// carried untouched — a rule may hold stale data from a prior frequency
/// selection, and that data is ignored rather than validated away.
///
/// An absent field under its matching frequency means "every day".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Weekday numbers, 1 = Monday … 7 = Sunday.
    pub weekdays: Option<BTreeSet<u32>>,
    /// Day-of-month numbers, 1–31.
    pub month_days: Option<BTreeSet<u32>>,
    /// A fixed (day, month) pair.
    pub year_day: Option<(u32, u32)>,
}

/// A recurrence: frequency plus its rule data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub frequency: Frequency,
    pub rule: RecurrenceRule,
}

impl RecurrenceSpec {
    /// A non-repeating spec (single occurrence on the start date).
    pub fn once() -> Self {
        Self::default()
    }

    pub fn daily() -> Self {
        Self {
            frequency: Frequency::Daily,
            rule: RecurrenceRule::default(),
        }
    }

    /// Weekly on the given weekday numbers (1 = Monday … 7 = Sunday).
    pub fn weekly<I: IntoIterator<Item = u32>>(weekdays: I) -> Self {
        Self {
            frequency: Frequency::Weekly,
            rule: RecurrenceRule {
                weekdays: Some(weekdays.into_iter().collect()),
                ..RecurrenceRule::default()
            },
        }
    }

    /// Monthly on the given day-of-month numbers (1–31).
    pub fn monthly<I: IntoIterator<Item = u32>>(month_days: I) -> Self {
        Self {
            frequency: Frequency::Monthly,
            rule: RecurrenceRule {
                month_days: Some(month_days.into_iter().collect()),
                ..RecurrenceRule::default()
            },
        }
    }

    /// Yearly on a fixed (day, month).
    pub fn yearly(day: u32, month: u32) -> Self {
        Self {
            frequency: Frequency::Yearly,
            rule: RecurrenceRule {
                year_day: Some((day, month)),
                ..RecurrenceRule::default()
            },
        }
    }
}

/// A label that events and tasks may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A dated deadline that tasks may link to; drives the urgency sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
}

/// A recurring calendar event master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEvent {
    pub id: i64,
    pub title: String,
    pub category_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence: RecurrenceSpec,
}

/// A recurring window of availability into which auto-scheduled tasks are
/// placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBucket {
    pub id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence: RecurrenceSpec,
}

/// One concrete dated instance of a [`MasterEvent`]. Derived, disposable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOccurrence {
    pub id: i64,
    pub event_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Reserved for future per-occurrence edits.
    pub is_exception: bool,
}

/// One concrete dated instance of a [`TaskBucket`]. Derived, disposable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOccurrence {
    pub id: i64,
    pub bucket_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Reserved for future per-occurrence edits.
    pub is_exception: bool,
}

/// A work item to be placed into free time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    /// 1–5, 1 is the highest priority.
    pub priority: u8,
    /// Whether the task may be split across multiple non-contiguous intervals.
    pub breakable: bool,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    /// Estimated total duration in minutes.
    pub predicted_minutes: i64,
    pub deadline_id: Option<i64>,
    pub dependency_task_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Task {
    /// A task is manual iff the user pinned both a start date and a start
    /// time; manual tasks are exempt from auto-assignment.
    pub fn is_manual(&self) -> bool {
        self.start_date.is_some() && self.start_time.is_some()
    }
}

/// One assigned block of time for a task. Regenerated wholesale on every
/// scheduling pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInterval {
    pub id: i64,
    pub task_id: i64,
    /// 1-based, sequential per task.
    pub interval_no: u32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TaskInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

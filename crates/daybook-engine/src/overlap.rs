//! Conflict detection between a proposed recurring item and existing
//! occurrences.
//!
//! Time windows are half-open `[start, end)` — adjacent windows where one
//! ends exactly when another starts do NOT conflict.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::expander::{expand_recurrence, DayWindow};
use crate::model::RecurrenceSpec;

/// Which kind of existing occurrence a candidate collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapKind {
    Event,
    Bucket,
}

/// Result of an overlap check. The default value is "no conflict"; on a
/// conflict, `date`/`start_time`/`end_time` describe the existing occurrence
/// that was hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapInfo {
    pub has_overlap: bool,
    pub kind: Option<OverlapKind>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl OverlapInfo {
    /// The no-conflict value.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn conflict(kind: OverlapKind, window: DayWindow) -> Self {
        Self {
            has_overlap: true,
            kind: Some(kind),
            date: Some(window.date),
            start_time: Some(window.start_time),
            end_time: Some(window.end_time),
        }
    }
}

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && e1 > s2`. Symmetric in its two intervals.
pub fn ranges_overlap(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && e1 > s2
}

/// Check a proposed recurring window against existing occurrences.
///
/// The candidate is expanded over the same horizon its occurrences would be
/// generated for; every expanded date is tested against the existing
/// occurrences sharing that date. The first conflict in scan order wins —
/// dates ascending, then `existing` in the order given — which is not
/// necessarily the earliest conflicting *time* if `existing` is unsorted.
///
/// Never fails; no conflict yields [`OverlapInfo::none`].
#[allow(clippy::too_many_arguments)]
pub fn check_overlap(
    spec: &RecurrenceSpec,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    today: NaiveDate,
    horizon_months: u32,
    existing: &[DayWindow],
    kind: OverlapKind,
) -> OverlapInfo {
    let candidates = expand_recurrence(
        spec,
        start_date,
        end_date,
        start_time,
        end_time,
        today,
        horizon_months,
    );
    for candidate in candidates {
        for other in existing.iter().filter(|w| w.date == candidate.date) {
            if ranges_overlap(
                candidate.start_time,
                candidate.end_time,
                other.start_time,
                other.end_time,
            ) {
                return OverlapInfo::conflict(kind, *other);
            }
        }
    }
    OverlapInfo::none()
}

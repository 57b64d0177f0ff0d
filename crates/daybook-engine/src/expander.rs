//! Recurrence expansion — converts a recurrence spec into concrete dated
//! occurrence windows.
//!
//! The walk is deliberately day-by-day for every frequency: a weekly rule may
//! select several non-contiguous weekdays and a monthly rule several
//! month-days within one cycle, so jumping by week or month increments would
//! skip matches. The single exception is yearly, which advances by twelve
//! months once matched — a yearly rule matches at most once per cycle.

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::{Frequency, RecurrenceSpec};

/// One expanded occurrence: a date carrying the master's fixed time-of-day
/// window. Time-of-day does not vary by occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Expand a recurrence spec into concrete occurrence windows.
///
/// The scan window is `[max(start_date, today), min(end_date, today +
/// horizon_months)]`; a missing `end_date` means the horizon alone bounds the
/// scan. The result is a pure function of the arguments — `today` is passed
/// in, never read from a clock — so re-invoking with identical inputs yields
/// an identical sequence.
///
/// A vacuous window yields an empty vector; there are no error conditions.
/// Rules missing their frequency-relevant data match every day in the window.
pub fn expand_recurrence(
    spec: &RecurrenceSpec,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    today: NaiveDate,
    horizon_months: u32,
) -> Vec<DayWindow> {
    let Some(horizon_end) = today.checked_add_months(Months::new(horizon_months)) else {
        return Vec::new();
    };
    let scan_start = start_date.max(today);
    let scan_end = end_date.map_or(horizon_end, |e| e.min(horizon_end));

    let mut windows = Vec::new();
    let mut cursor = scan_start;
    while cursor <= scan_end {
        let matched = matches_rule(spec, start_date, cursor);
        if matched {
            windows.push(DayWindow {
                date: cursor,
                start_time,
                end_time,
            });
        }

        // Yearly matches at most once per 365 days, so the cursor can jump a
        // full cycle after a hit. Every other frequency advances one day.
        let next = if matched && spec.frequency == Frequency::Yearly {
            cursor.checked_add_months(Months::new(12))
        } else {
            cursor.succ_opt()
        };
        match next {
            Some(date) => cursor = date,
            None => break,
        }
    }
    windows
}

/// Whether `date` is an occurrence of the spec anchored at `start_date`.
fn matches_rule(spec: &RecurrenceSpec, start_date: NaiveDate, date: NaiveDate) -> bool {
    match spec.frequency {
        // Exactly the original start date, even though the walk covers the
        // whole window.
        Frequency::None => date == start_date,
        Frequency::Daily => true,
        Frequency::Weekly => spec
            .rule
            .weekdays
            .as_ref()
            .is_none_or(|days| days.contains(&date.weekday().number_from_monday())),
        Frequency::Monthly => spec
            .rule
            .month_days
            .as_ref()
            .is_none_or(|days| days.contains(&date.day())),
        Frequency::Yearly => spec
            .rule
            .year_day
            .is_none_or(|(day, month)| date.day() == day && date.month() == month),
    }
}

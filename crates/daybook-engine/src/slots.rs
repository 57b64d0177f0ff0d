//! Free-slot computation — availability buckets minus already-claimed time.
//!
//! Each bucket occurrence starts as one free slot spanning its full window;
//! manual task intervals on the same date are subtracted one at a time, each
//! subtraction replacing a slot with zero, one, or two sub-slots.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::{BucketOccurrence, TaskInterval};
use crate::overlap::ranges_overlap;

/// A free window of time on one date. Transient — exists only within one
/// scheduling pass, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl FreeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Compute the free slots left in `buckets` after subtracting `manual`
/// intervals, sorted by `(date, start_time)` ascending. That ordering is what
/// gives earlier slots priority during assignment.
///
/// Subtracting an interval that overlaps a slot leaves a "before" part when
/// the interval starts strictly inside the slot and an "after" part when it
/// ends strictly inside; an interval covering the whole slot erases it.
/// Zero-duration slots are dropped — they can satisfy no task.
pub fn compute_free_slots(buckets: &[BucketOccurrence], manual: &[TaskInterval]) -> Vec<FreeSlot> {
    let mut slots = Vec::new();

    for bucket in buckets {
        let mut day_slots = vec![FreeSlot {
            date: bucket.date,
            start_time: bucket.start_time,
            end_time: bucket.end_time,
        }];

        for interval in manual.iter().filter(|m| m.date == bucket.date) {
            let mut remaining = Vec::with_capacity(day_slots.len() + 1);
            for slot in day_slots {
                if !ranges_overlap(
                    slot.start_time,
                    slot.end_time,
                    interval.start_time,
                    interval.end_time,
                ) {
                    remaining.push(slot);
                    continue;
                }
                if interval.start_time > slot.start_time {
                    remaining.push(FreeSlot {
                        date: slot.date,
                        start_time: slot.start_time,
                        end_time: interval.start_time,
                    });
                }
                if interval.end_time < slot.end_time {
                    remaining.push(FreeSlot {
                        date: slot.date,
                        start_time: interval.end_time,
                        end_time: slot.end_time,
                    });
                }
            }
            day_slots = remaining;
        }

        slots.extend(day_slots);
    }

    slots.retain(|s| s.start_time < s.end_time);
    slots.sort_by_key(|s| (s.date, s.start_time));
    slots
}

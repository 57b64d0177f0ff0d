//! First-fit interval assignment.
//!
//! Walks the ordered task list against the free-slot list, placing whole or
//! partial time intervals. Slots are always tried in ascending (date, time)
//! order, so earlier-available time wins even when a later slot would fit
//! more tightly.

use chrono::Duration;

use crate::model::TaskInterval;
use crate::ordering::OrderedTask;
use crate::slots::FreeSlot;

/// Assign `ordered` tasks into `slots`, consuming both in place.
///
/// Per head task, slots are scanned in list order:
///
/// - A slot that can hold the task's remaining duration takes all of it,
///   starting at the slot's start; an exact fit removes the slot, otherwise
///   the slot shrinks to the leftover window.
/// - A smaller slot is consumed whole as a partial interval when the task is
///   breakable and the slot is at least `min_chunk_minutes` long; the task
///   stays at the head and the scan continues over the remaining slots.
/// - Any other slot is skipped.
///
/// A task no slot can hold (fully or partially) leaves the work list with
/// whatever partial intervals it already earned — ending a pass with zero
/// intervals is the "not scheduled this cycle" outcome, not an error.
///
/// Returned intervals are unpersisted (`id` 0); `interval_no` is 1-based and
/// sequential per task. The caller inserts them into the store.
pub fn assign_intervals(
    ordered: &mut Vec<OrderedTask>,
    slots: &mut Vec<FreeSlot>,
    min_chunk_minutes: i64,
) -> Vec<TaskInterval> {
    let mut created: Vec<TaskInterval> = Vec::new();

    while !ordered.is_empty() && !slots.is_empty() {
        let task_id = ordered[0].task.id;
        let breakable = ordered[0].task.breakable;
        let mut interval_no = 0u32;

        let mut s = 0;
        while s < slots.len() {
            let remaining = ordered[0].remaining_minutes;
            let slot_minutes = slots[s].duration_minutes();

            if slot_minutes >= remaining {
                let slot = &mut slots[s];
                let end_time = slot.start_time + Duration::minutes(remaining);
                interval_no += 1;
                created.push(TaskInterval {
                    id: 0,
                    task_id,
                    interval_no,
                    date: slot.date,
                    start_time: slot.start_time,
                    end_time,
                });
                if slot_minutes == remaining {
                    slots.remove(s);
                } else {
                    slot.start_time = end_time;
                }
                ordered[0].remaining_minutes = 0;
                break;
            }

            if breakable && slot_minutes >= min_chunk_minutes {
                // Consume the whole slot as one partial interval; the same
                // index now points at the next slot.
                let slot = slots.remove(s);
                interval_no += 1;
                created.push(TaskInterval {
                    id: 0,
                    task_id,
                    interval_no,
                    date: slot.date,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                });
                ordered[0].remaining_minutes -= slot_minutes;
            } else {
                s += 1;
            }
        }

        // Fully placed or out of usable slots — either way the head task is
        // done for this pass.
        ordered.remove(0);
    }

    created
}

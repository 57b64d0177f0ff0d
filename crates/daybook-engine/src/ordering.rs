//! Deterministic task ordering for auto-assignment.
//!
//! A stable multi-key sort produces the base priority order; a follow-up
//! dependency-chain pass rewrites it so a task's declared dependency comes
//! before the task itself.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::model::{Deadline, Task};

/// A task queued for assignment, with the duration still to be placed.
/// `remaining_minutes` is decremented in place as the assigner consumes slot
/// capacity for breakable tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTask {
    pub task: Task,
    pub remaining_minutes: i64,
}

impl OrderedTask {
    pub fn new(task: Task) -> Self {
        Self {
            remaining_minutes: task.predicted_minutes,
            task,
        }
    }
}

/// Pluggable contribution of category and event affinity to the sort key.
///
/// Both scores sort ascending between urgency and the id tiebreak. The
/// shipped [`ZeroScoring`] returns 0 for every task, so these keys are inert
/// until a real heuristic replaces it.
pub trait ScoringStrategy {
    fn category_score(&self, task: &Task) -> i64;
    fn event_score(&self, task: &Task) -> i64;
}

/// The default scoring: every task scores 0 on both keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroScoring;

impl ScoringStrategy for ZeroScoring {
    fn category_score(&self, _task: &Task) -> i64 {
        0
    }

    fn event_score(&self, _task: &Task) -> i64 {
        0
    }
}

/// Urgency sentinel for tasks without a deadline: sorts after every task
/// that has one, at equal priority.
const NO_DEADLINE: i64 = i64::MAX;

/// Days from `today` until the task's linked deadline; negative when the
/// deadline has passed. A missing or dangling deadline link yields the
/// sentinel.
fn urgency(task: &Task, deadline_dates: &HashMap<i64, NaiveDate>, today: NaiveDate) -> i64 {
    task.deadline_id
        .and_then(|id| deadline_dates.get(&id))
        .map_or(NO_DEADLINE, |date| (*date - today).num_days())
}

/// Produce the assignment order for `tasks`.
///
/// Sort key, ascending and stable: priority (1 highest), urgency, category
/// score, event score, then id (creation order).
///
/// The dependency pass then scans left to right: when a task's dependency
/// currently sits later in the list, the dependency is moved to directly
/// before the task and the scan re-checks the same index, which absorbs
/// transitive chains. Each dependency is moved at most once — that guard
/// terminates cycles silently instead of looping, at the cost of leaving
/// multi-node cycles only partially ordered. Acyclic graphs order stably.
pub fn order_tasks(
    tasks: &[Task],
    deadlines: &[Deadline],
    today: NaiveDate,
    scoring: &dyn ScoringStrategy,
) -> Vec<OrderedTask> {
    let deadline_dates: HashMap<i64, NaiveDate> =
        deadlines.iter().map(|d| (d.id, d.date)).collect();

    let mut ordered: Vec<OrderedTask> = tasks.iter().cloned().map(OrderedTask::new).collect();
    ordered.sort_by_key(|o| {
        (
            o.task.priority,
            urgency(&o.task, &deadline_dates, today),
            scoring.category_score(&o.task),
            scoring.event_score(&o.task),
            o.task.id,
        )
    });

    let mut moved: HashSet<i64> = HashSet::new();
    let mut i = 0;
    while i < ordered.len() {
        if let Some(dep_id) = ordered[i].task.dependency_task_id {
            if !moved.contains(&dep_id) {
                let dep_pos = ordered.iter().position(|o| o.task.id == dep_id);
                if let Some(j) = dep_pos {
                    if j > i {
                        let dep = ordered.remove(j);
                        ordered.insert(i, dep);
                        moved.insert(dep_id);
                        // Re-check the shifted position instead of advancing.
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    ordered
}

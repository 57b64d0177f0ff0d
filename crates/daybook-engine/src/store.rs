//! Persistence-store contract and the in-memory implementation.
//!
//! The engine reads and writes through [`PlanStore`], independent of storage
//! technology. The trait is synchronous: a scheduling pass is a blocking,
//! sequential unit of work, and callers serialize passes at their boundary —
//! no transactional isolation is assumed between the read and write phases.
//!
//! [`MemoryStore`] backs tests and the CLI plan file (its serde JSON form is
//! the file format).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::{
    BucketOccurrence, Category, Deadline, EventOccurrence, MasterEvent, Task, TaskBucket,
    TaskInterval,
};

/// Store contract the engine needs: read all / by id / by foreign key,
/// insert one (returning the assigned id), update by id, delete by id, and
/// bulk delete for derived rows.
///
/// Deleting a master cascades to the derived rows it owns. Deleting a
/// category or deadline leaves referencing tasks untouched — a dangling
/// deadline link simply sorts as "no deadline".
pub trait PlanStore {
    // Categories
    fn categories(&self) -> Result<Vec<Category>>;
    fn insert_category(&mut self, category: Category) -> Result<i64>;
    fn delete_category(&mut self, id: i64) -> Result<()>;

    // Deadlines
    fn deadlines(&self) -> Result<Vec<Deadline>>;
    fn insert_deadline(&mut self, deadline: Deadline) -> Result<i64>;
    fn delete_deadline(&mut self, id: i64) -> Result<()>;

    // Recurring events
    fn events(&self) -> Result<Vec<MasterEvent>>;
    fn event(&self, id: i64) -> Result<Option<MasterEvent>>;
    fn insert_event(&mut self, event: MasterEvent) -> Result<i64>;
    fn update_event(&mut self, event: &MasterEvent) -> Result<()>;
    fn delete_event(&mut self, id: i64) -> Result<()>;

    // Event occurrences (derived)
    fn event_occurrences(&self) -> Result<Vec<EventOccurrence>>;
    fn event_occurrences_for(&self, event_id: i64) -> Result<Vec<EventOccurrence>>;
    fn insert_event_occurrence(&mut self, occurrence: EventOccurrence) -> Result<i64>;
    fn delete_event_occurrences_for(&mut self, event_id: i64) -> Result<()>;

    // Task buckets
    fn buckets(&self) -> Result<Vec<TaskBucket>>;
    fn bucket(&self, id: i64) -> Result<Option<TaskBucket>>;
    fn insert_bucket(&mut self, bucket: TaskBucket) -> Result<i64>;
    fn update_bucket(&mut self, bucket: &TaskBucket) -> Result<()>;
    fn delete_bucket(&mut self, id: i64) -> Result<()>;

    // Bucket occurrences (derived)
    fn bucket_occurrences(&self) -> Result<Vec<BucketOccurrence>>;
    fn bucket_occurrences_for(&self, bucket_id: i64) -> Result<Vec<BucketOccurrence>>;
    fn insert_bucket_occurrence(&mut self, occurrence: BucketOccurrence) -> Result<i64>;
    fn delete_bucket_occurrences_for(&mut self, bucket_id: i64) -> Result<()>;

    // Tasks
    fn tasks(&self) -> Result<Vec<Task>>;
    fn task(&self, id: i64) -> Result<Option<Task>>;
    fn insert_task(&mut self, task: Task) -> Result<i64>;
    fn update_task(&mut self, task: &Task) -> Result<()>;
    fn delete_task(&mut self, id: i64) -> Result<()>;

    // Task intervals (derived)
    fn task_intervals(&self) -> Result<Vec<TaskInterval>>;
    fn intervals_for_task(&self, task_id: i64) -> Result<Vec<TaskInterval>>;
    fn insert_task_interval(&mut self, interval: TaskInterval) -> Result<i64>;
    fn delete_all_task_intervals(&mut self) -> Result<()>;
}

/// In-memory [`PlanStore`] over plain vectors with a monotonic id counter.
///
/// Serializes to and from JSON — the CLI persists a whole plan by writing
/// this struct out and reading it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: i64,
    categories: Vec<Category>,
    deadlines: Vec<Deadline>,
    events: Vec<MasterEvent>,
    event_occurrences: Vec<EventOccurrence>,
    buckets: Vec<TaskBucket>,
    bucket_occurrences: Vec<BucketOccurrence>,
    tasks: Vec<Task>,
    task_intervals: Vec<TaskInterval>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn missing(entity: &'static str, id: i64) -> EngineError {
        EngineError::NotFound { entity, id }
    }
}

impl PlanStore for MemoryStore {
    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn insert_category(&mut self, mut category: Category) -> Result<i64> {
        category.id = self.alloc_id();
        let id = category.id;
        self.categories.push(category);
        Ok(id)
    }

    fn delete_category(&mut self, id: i64) -> Result<()> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return Err(Self::missing("category", id));
        }
        Ok(())
    }

    fn deadlines(&self) -> Result<Vec<Deadline>> {
        Ok(self.deadlines.clone())
    }

    fn insert_deadline(&mut self, mut deadline: Deadline) -> Result<i64> {
        deadline.id = self.alloc_id();
        let id = deadline.id;
        self.deadlines.push(deadline);
        Ok(id)
    }

    fn delete_deadline(&mut self, id: i64) -> Result<()> {
        let before = self.deadlines.len();
        self.deadlines.retain(|d| d.id != id);
        if self.deadlines.len() == before {
            return Err(Self::missing("deadline", id));
        }
        Ok(())
    }

    fn events(&self) -> Result<Vec<MasterEvent>> {
        Ok(self.events.clone())
    }

    fn event(&self, id: i64) -> Result<Option<MasterEvent>> {
        Ok(self.events.iter().find(|e| e.id == id).cloned())
    }

    fn insert_event(&mut self, mut event: MasterEvent) -> Result<i64> {
        event.id = self.alloc_id();
        let id = event.id;
        self.events.push(event);
        Ok(id)
    }

    fn update_event(&mut self, event: &MasterEvent) -> Result<()> {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(row) => {
                *row = event.clone();
                Ok(())
            }
            None => Err(Self::missing("event", event.id)),
        }
    }

    fn delete_event(&mut self, id: i64) -> Result<()> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(Self::missing("event", id));
        }
        self.event_occurrences.retain(|o| o.event_id != id);
        Ok(())
    }

    fn event_occurrences(&self) -> Result<Vec<EventOccurrence>> {
        Ok(self.event_occurrences.clone())
    }

    fn event_occurrences_for(&self, event_id: i64) -> Result<Vec<EventOccurrence>> {
        Ok(self
            .event_occurrences
            .iter()
            .filter(|o| o.event_id == event_id)
            .cloned()
            .collect())
    }

    fn insert_event_occurrence(&mut self, mut occurrence: EventOccurrence) -> Result<i64> {
        occurrence.id = self.alloc_id();
        let id = occurrence.id;
        self.event_occurrences.push(occurrence);
        Ok(id)
    }

    fn delete_event_occurrences_for(&mut self, event_id: i64) -> Result<()> {
        self.event_occurrences.retain(|o| o.event_id != event_id);
        Ok(())
    }

    fn buckets(&self) -> Result<Vec<TaskBucket>> {
        Ok(self.buckets.clone())
    }

    fn bucket(&self, id: i64) -> Result<Option<TaskBucket>> {
        Ok(self.buckets.iter().find(|b| b.id == id).cloned())
    }

    fn insert_bucket(&mut self, mut bucket: TaskBucket) -> Result<i64> {
        bucket.id = self.alloc_id();
        let id = bucket.id;
        self.buckets.push(bucket);
        Ok(id)
    }

    fn update_bucket(&mut self, bucket: &TaskBucket) -> Result<()> {
        match self.buckets.iter_mut().find(|b| b.id == bucket.id) {
            Some(row) => {
                *row = bucket.clone();
                Ok(())
            }
            None => Err(Self::missing("bucket", bucket.id)),
        }
    }

    fn delete_bucket(&mut self, id: i64) -> Result<()> {
        let before = self.buckets.len();
        self.buckets.retain(|b| b.id != id);
        if self.buckets.len() == before {
            return Err(Self::missing("bucket", id));
        }
        self.bucket_occurrences.retain(|o| o.bucket_id != id);
        Ok(())
    }

    fn bucket_occurrences(&self) -> Result<Vec<BucketOccurrence>> {
        Ok(self.bucket_occurrences.clone())
    }

    fn bucket_occurrences_for(&self, bucket_id: i64) -> Result<Vec<BucketOccurrence>> {
        Ok(self
            .bucket_occurrences
            .iter()
            .filter(|o| o.bucket_id == bucket_id)
            .cloned()
            .collect())
    }

    fn insert_bucket_occurrence(&mut self, mut occurrence: BucketOccurrence) -> Result<i64> {
        occurrence.id = self.alloc_id();
        let id = occurrence.id;
        self.bucket_occurrences.push(occurrence);
        Ok(id)
    }

    fn delete_bucket_occurrences_for(&mut self, bucket_id: i64) -> Result<()> {
        self.bucket_occurrences.retain(|o| o.bucket_id != bucket_id);
        Ok(())
    }

    fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn task(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn insert_task(&mut self, mut task: Task) -> Result<i64> {
        task.id = self.alloc_id();
        let id = task.id;
        self.tasks.push(task);
        Ok(id)
    }

    fn update_task(&mut self, task: &Task) -> Result<()> {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(row) => {
                *row = task.clone();
                Ok(())
            }
            None => Err(Self::missing("task", task.id)),
        }
    }

    fn delete_task(&mut self, id: i64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(Self::missing("task", id));
        }
        self.task_intervals.retain(|i| i.task_id != id);
        Ok(())
    }

    fn task_intervals(&self) -> Result<Vec<TaskInterval>> {
        Ok(self.task_intervals.clone())
    }

    fn intervals_for_task(&self, task_id: i64) -> Result<Vec<TaskInterval>> {
        Ok(self
            .task_intervals
            .iter()
            .filter(|i| i.task_id == task_id)
            .cloned()
            .collect())
    }

    fn insert_task_interval(&mut self, mut interval: TaskInterval) -> Result<i64> {
        interval.id = self.alloc_id();
        let id = interval.id;
        self.task_intervals.push(interval);
        Ok(id)
    }

    fn delete_all_task_intervals(&mut self) -> Result<()> {
        self.task_intervals.clear();
        Ok(())
    }
}

//! # daybook-engine
//!
//! The recurrence-and-auto-scheduling engine behind the daybook planner.
//!
//! The engine expands recurring calendar rules into concrete dated
//! occurrences, detects time-range conflicts between recurring items, and
//! places unscheduled tasks into free availability windows using a priority
//! heuristic with dependency ordering and partial-interval splitting. It is
//! a pure function of (store contents, `today`) — no hidden state, no system
//! clock — invoked through two entry points: occurrence regeneration after a
//! master edit, and the scheduling pass after anything that could affect
//! auto-assignment.
//!
//! ## Modules
//!
//! - [`expander`] — recurrence spec → concrete dated occurrence windows
//! - [`overlap`] — half-open conflict detection for proposed recurring items
//! - [`slots`] — availability buckets minus claimed time → free slots
//! - [`ordering`] — priority/urgency/dependency ordering of tasks
//! - [`assign`] — first-fit interval assignment with breakable splitting
//! - [`scheduler`] — entry points composing the above against a store
//! - [`store`] — the persistence contract and the in-memory implementation
//! - [`model`] — persisted entities and recurrence types
//! - [`error`] — error types

pub mod assign;
pub mod error;
pub mod expander;
pub mod model;
pub mod ordering;
pub mod overlap;
pub mod scheduler;
pub mod slots;
pub mod store;

pub use assign::assign_intervals;
pub use error::EngineError;
pub use expander::{expand_recurrence, DayWindow};
pub use ordering::{order_tasks, OrderedTask, ScoringStrategy, ZeroScoring};
pub use overlap::{check_overlap, ranges_overlap, OverlapInfo, OverlapKind};
pub use scheduler::{
    check_bucket_conflicts, check_event_conflicts, regenerate_bucket_occurrences,
    regenerate_event_occurrences, run_scheduling_pass, PassSummary, SchedulerConfig,
};
pub use slots::{compute_free_slots, FreeSlot};
pub use store::{MemoryStore, PlanStore};

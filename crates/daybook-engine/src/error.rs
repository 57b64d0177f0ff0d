//! Error types for daybook-engine operations.
//!
//! The scheduling algorithms themselves never fail — an unschedulable task,
//! a rule with missing constraint data, or a dependency cycle are all
//! expressed as data, not as errors. `EngineError` exists for the store
//! boundary only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The persistence store reported a failure.
    #[error("store error: {0}")]
    Store(String),

    /// An entity referenced by id does not exist in the store.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;

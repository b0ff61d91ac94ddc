//! Common utilities shared across all database implementations

pub mod deadline;
pub mod error;

pub use deadline::{CancelFn, CancelReason, DeadlineContext};
pub use error::{DatabaseError, DatabaseResult};

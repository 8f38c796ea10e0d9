//! Core types - pure abstractions shared across the codebase.

mod failure;
mod mode;

pub use failure::FailurePolicy;
pub use mode::ExecutionMode;

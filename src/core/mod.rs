//! Core types - pure abstractions shared across the codebase.

mod state;
mod task;

pub use state::{
    begin_update, end_update, is_busy, is_serving, is_shutdown, register_server,
    register_shutdown, set_serving, setup_shutdown_handler,
};
pub use task::{
    FailureKind, RunReport, TaskFailure, TaskId, TaskOutcome, TaskRecord, TaskSummary,
};

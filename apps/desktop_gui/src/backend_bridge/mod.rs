//! Backend worker: owns the tokio runtime and the task list controller.

pub mod commands;
pub mod runtime;

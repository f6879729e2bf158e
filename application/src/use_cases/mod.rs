//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod create_task;
pub mod process_task;
pub mod validate_benchmarks;

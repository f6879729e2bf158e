//! Experiment aggregate: the task, its scoring method selector, its
//! persisted results, and human benchmark reference rows.

pub mod method;
pub mod result;
pub mod task;

pub use method::TaskMethod;
pub use result::{HumanBenchmark, TaskResult};
pub use task::{OpsContext, Task, TaskStatus};

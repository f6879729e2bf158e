//! Output formatting for panel runs

pub mod report;

pub use report::{ConsoleFormatter, RunReport, TaskReport};

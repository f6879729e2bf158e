//! Progress notifiers for the console

pub mod reporter;

pub use reporter::{ProgressReporter, SimpleProgress};

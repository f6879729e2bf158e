//! Application layer for persona-panel
//!
//! This crate contains use cases, port definitions, the task orchestrator,
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod orchestrator;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::OrchestratorParams;
pub use orchestrator::{OrchestratorError, TaskOrchestrator};
pub use ports::{
    progress::{NoProgress, PersonaProgress, ProgressNotifier, TaskProgress},
    repository::{PanelRepository, RepositoryError},
    responder::{
        ImageAttachment, LocalSynthesizer, OpinionRequest, OpinionResponder, ResponderError,
    },
};
pub use use_cases::create_task::{CreateTaskError, CreateTaskInput, CreateTaskUseCase};
pub use use_cases::process_task::{ProcessTaskUseCase, ProgressCounters};
pub use use_cases::validate_benchmarks::{
    BenchmarkMatch, ValidateBenchmarksInput, ValidateBenchmarksUseCase, ValidationReport,
};

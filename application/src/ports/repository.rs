//! Persistence port
//!
//! Defines how the application layer reads and writes panel entities,
//! tasks, results, and human benchmarks. Implementations (adapters) live
//! in the infrastructure layer.

use async_trait::async_trait;
use panel_domain::{
    Criterion, CriterionId, HumanBenchmark, Persona, PersonaId, PromptTemplate, Task, TaskId,
    TaskResult, TemplateId,
};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Persona {0} not found")]
    PersonaNotFound(PersonaId),

    #[error("Criterion {0} not found")]
    CriterionNotFound(CriterionId),

    #[error("Prompt template {0} not found")]
    TemplateNotFound(TemplateId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Store for panels, tasks, results, and benchmarks.
///
/// Writes are expected to be serializable per entity; the orchestrator
/// never holds a lock across a generation unit, so adapters must tolerate
/// interleaved task and result writes from concurrent workers.
#[async_trait]
pub trait PanelRepository: Send + Sync {
    /// Allocates the next task id from the store's sequence.
    async fn next_task_id(&self) -> Result<TaskId, RepositoryError>;

    async fn task(&self, id: TaskId) -> Result<Task, RepositoryError>;

    /// Inserts or overwrites a task (status transitions go through here).
    async fn save_task(&self, task: &Task) -> Result<(), RepositoryError>;

    async fn tasks(&self) -> Result<Vec<Task>, RepositoryError>;

    async fn personas(&self) -> Result<Vec<Persona>, RepositoryError>;

    /// Resolves personas in the given id order; fails on the first id with
    /// no stored persona.
    async fn personas_by_ids(&self, ids: &[PersonaId]) -> Result<Vec<Persona>, RepositoryError>;

    async fn save_persona(&self, persona: &Persona) -> Result<(), RepositoryError>;

    async fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError>;

    /// Resolves criteria in the given id order; fails on the first id with
    /// no stored criterion.
    async fn criteria_by_ids(&self, ids: &[CriterionId]) -> Result<Vec<Criterion>, RepositoryError>;

    async fn save_criterion(&self, criterion: &Criterion) -> Result<(), RepositoryError>;

    async fn prompt_template(&self, id: TemplateId) -> Result<PromptTemplate, RepositoryError>;

    async fn save_template(&self, template: &PromptTemplate) -> Result<(), RepositoryError>;

    /// Commits one run's results as a batch. Earlier runs' results for the
    /// same task are kept; re-runs accumulate.
    async fn save_results(&self, results: &[TaskResult]) -> Result<(), RepositoryError>;

    async fn results_for_task(&self, id: TaskId) -> Result<Vec<TaskResult>, RepositoryError>;

    async fn benchmarks(&self) -> Result<Vec<HumanBenchmark>, RepositoryError>;

    async fn save_benchmark(&self, benchmark: &HumanBenchmark) -> Result<(), RepositoryError>;
}

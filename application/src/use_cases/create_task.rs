//! Create Task use case
//!
//! Validates that every referenced persona, criterion, and template
//! resolves, then persists a new pending task. Resolution failures reject
//! the task before any processing starts.

use crate::ports::repository::{PanelRepository, RepositoryError};
use panel_domain::{
    CriterionId, DomainError, OpsContext, PersonaId, Task, TaskMethod, TemplateId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when creating a task
#[derive(Error, Debug)]
pub enum CreateTaskError {
    #[error("Invalid task: {0}")]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for the CreateTask use case
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub title: String,
    pub persona_ids: Vec<PersonaId>,
    pub criterion_ids: Vec<CriterionId>,
    pub stimulus_text: Option<String>,
    pub image_name: Option<String>,
    pub image_data: Option<String>,
    pub guidance: Option<String>,
    pub session_label: Option<String>,
    pub operation_context: OpsContext,
    pub prompt_template_id: Option<TemplateId>,
    pub method: TaskMethod,
    pub run_seed: Option<u64>,
}

impl CreateTaskInput {
    pub fn new(
        title: impl Into<String>,
        persona_ids: Vec<PersonaId>,
        criterion_ids: Vec<CriterionId>,
    ) -> Self {
        Self {
            title: title.into(),
            persona_ids,
            criterion_ids,
            stimulus_text: None,
            image_name: None,
            image_data: None,
            guidance: None,
            session_label: None,
            operation_context: OpsContext::default(),
            prompt_template_id: None,
            method: TaskMethod::default(),
            run_seed: None,
        }
    }

    pub fn with_stimulus_text(mut self, text: impl Into<String>) -> Self {
        self.stimulus_text = Some(text.into());
        self
    }

    pub fn with_image(mut self, name: impl Into<String>, data_b64: impl Into<String>) -> Self {
        self.image_name = Some(name.into());
        self.image_data = Some(data_b64.into());
        self
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    pub fn with_session_label(mut self, label: impl Into<String>) -> Self {
        self.session_label = Some(label.into());
        self
    }

    pub fn with_operation_context(mut self, context: OpsContext) -> Self {
        self.operation_context = context;
        self
    }

    pub fn with_template(mut self, template_id: TemplateId) -> Self {
        self.prompt_template_id = Some(template_id);
        self
    }

    pub fn with_method(mut self, method: TaskMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_run_seed(mut self, seed: u64) -> Self {
        self.run_seed = Some(seed);
        self
    }
}

/// Use case for creating a task
pub struct CreateTaskUseCase<R: PanelRepository + 'static> {
    repository: Arc<R>,
}

impl<R: PanelRepository + 'static> CreateTaskUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves every reference, then persists the task as `pending`.
    pub async fn execute(&self, input: CreateTaskInput) -> Result<Task, CreateTaskError> {
        self.repository.personas_by_ids(&input.persona_ids).await?;
        self.repository.criteria_by_ids(&input.criterion_ids).await?;
        if let Some(template_id) = input.prompt_template_id {
            self.repository.prompt_template(template_id).await?;
        }

        let id = self.repository.next_task_id().await?;
        let mut task = Task::new(id, input.title, input.persona_ids, input.criterion_ids)?
            .with_operation_context(input.operation_context)
            .with_method(input.method);
        if let Some(text) = input.stimulus_text {
            task = task.with_stimulus_text(text);
        }
        if let (Some(name), Some(data)) = (input.image_name, input.image_data) {
            task = task.with_image(name, data);
        }
        if let Some(guidance) = input.guidance {
            task = task.with_guidance(guidance);
        }
        if let Some(label) = input.session_label {
            task = task.with_session_label(label);
        }
        if let Some(template_id) = input.prompt_template_id {
            task = task.with_prompt_template(template_id);
        }
        if let Some(seed) = input.run_seed {
            task = task.with_run_seed(seed);
        }

        self.repository.save_task(&task).await?;
        info!(
            "Created task {} \"{}\" ({} personas, {} criteria, method {})",
            task.id,
            task.title,
            task.persona_count(),
            task.criterion_ids.len(),
            task.method
        );
        Ok(task)
    }
}

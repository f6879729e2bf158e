//! Task entity - one submitted experiment and its lifecycle

use crate::core::error::DomainError;
use crate::core::ids::{CriterionId, PersonaId, TaskId, TemplateId};
use crate::experiment::method::TaskMethod;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
///
/// `pending → processing → {completed | failed}`; re-enqueueing a terminal
/// task resets it to `pending` for a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Get the string identifier for this status
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Whether the task has finished this run (successfully or not)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured operation context with a fixed recognized key set.
///
/// Rendered into the combined stimulus in a fixed label order; empty values
/// are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsContext {
    pub game_title: Option<String>,
    pub genre: Option<String>,
    pub target_metric: Option<String>,
    pub liveops_cadence: Option<String>,
    pub monetization: Option<String>,
    pub seasonality: Option<String>,
    pub notes: Option<String>,
}

impl OpsContext {
    /// Recognized fields with their display labels, in render order.
    fn labeled_fields(&self) -> [(&'static str, Option<&String>); 7] {
        [
            ("Game", self.game_title.as_ref()),
            ("Genre", self.genre.as_ref()),
            ("Target KPI", self.target_metric.as_ref()),
            ("Cadence", self.liveops_cadence.as_ref()),
            ("Monetization", self.monetization.as_ref()),
            ("Seasonality", self.seasonality.as_ref()),
            ("Notes", self.notes.as_ref()),
        ]
    }

    /// `Label:value` fragments joined by ` | `, or `None` when every
    /// recognized key is absent or blank.
    pub fn context_line(&self) -> Option<String> {
        let fragments: Vec<String> = self
            .labeled_fields()
            .iter()
            .filter_map(|(label, value)| {
                value
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{label}:{v}"))
            })
            .collect();
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join(" | "))
        }
    }

    pub fn with_game_title(mut self, value: impl Into<String>) -> Self {
        self.game_title = Some(value.into());
        self
    }

    pub fn with_genre(mut self, value: impl Into<String>) -> Self {
        self.genre = Some(value.into());
        self
    }

    pub fn with_target_metric(mut self, value: impl Into<String>) -> Self {
        self.target_metric = Some(value.into());
        self
    }

    pub fn with_liveops_cadence(mut self, value: impl Into<String>) -> Self {
        self.liveops_cadence = Some(value.into());
        self
    }

    pub fn with_monetization(mut self, value: impl Into<String>) -> Self {
        self.monetization = Some(value.into());
        self
    }

    pub fn with_seasonality(mut self, value: impl Into<String>) -> Self {
        self.seasonality = Some(value.into());
        self
    }

    pub fn with_notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());
        self
    }
}

/// One submitted experiment.
///
/// A task stores persona and criterion ids, not copies; later edits to a
/// persona do not rewrite stored results but do affect any re-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub stimulus_text: Option<String>,
    pub image_name: Option<String>,
    /// Base64-encoded image payload handed to the external responder
    pub image_data: Option<String>,
    pub persona_ids: Vec<PersonaId>,
    pub criterion_ids: Vec<CriterionId>,
    pub guidance: Option<String>,
    pub session_label: Option<String>,
    pub operation_context: OpsContext,
    pub prompt_template_id: Option<TemplateId>,
    pub method: TaskMethod,
    pub run_seed: Option<u64>,
    pub status: TaskStatus,
    /// Fatal error for failed tasks, informational warnings for completed
    /// ones (e.g. responder fallbacks)
    pub error: Option<String>,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
    /// Last state change, epoch milliseconds
    pub updated_at: u64,
}

impl Task {
    /// Creates a pending task. Rejects empty persona or criterion sets.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        persona_ids: Vec<PersonaId>,
        criterion_ids: Vec<CriterionId>,
    ) -> Result<Self, DomainError> {
        if persona_ids.is_empty() {
            return Err(DomainError::NoPersonas);
        }
        if criterion_ids.is_empty() {
            return Err(DomainError::NoCriteria);
        }
        let now = now_millis();
        Ok(Self {
            id,
            title: title.into(),
            stimulus_text: None,
            image_name: None,
            image_data: None,
            persona_ids,
            criterion_ids,
            guidance: None,
            session_label: None,
            operation_context: OpsContext::default(),
            prompt_template_id: None,
            method: TaskMethod::default(),
            run_seed: None,
            status: TaskStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_stimulus_text(mut self, text: impl Into<String>) -> Self {
        self.stimulus_text = Some(text.into());
        self
    }

    /// Attaches an image by name and base64 payload.
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

    pub fn with_prompt_template(mut self, template_id: TemplateId) -> Self {
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

    /// Number of persona generation units one run of this task schedules.
    pub fn persona_count(&self) -> usize {
        self.persona_ids.len()
    }

    /// Marks the task as picked up by a worker.
    pub fn begin_processing(&mut self) {
        self.status = TaskStatus::Processing;
        self.touch();
    }

    /// Marks the run successful. `warnings` carries informational notes
    /// such as per-persona responder fallbacks; it does not signal failure.
    pub fn complete(&mut self, warnings: Option<String>) {
        self.status = TaskStatus::Completed;
        self.error = warnings;
        self.touch();
    }

    /// Marks the run failed with the first unrecovered error.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.touch();
    }

    /// Resets a task for re-submission: back to pending, prior error
    /// cleared. Prior results are untouched and accumulate across runs.
    pub fn reset_for_run(&mut self) {
        self.status = TaskStatus::Pending;
        self.error = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

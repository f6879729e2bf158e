//! Combined stimulus assembly.
//!
//! Every persona in a task evaluates the same combined stimulus string,
//! assembled once per task from the task fields and the resolved prompt
//! template.

use crate::experiment::task::{OpsContext, Task};
use crate::panel::template::PromptTemplate;

/// Fallback stimulus when every part is absent or blank.
pub const EMPTY_STIMULUS_PLACEHOLDER: &str = "(no description)";

/// The pieces of a task that feed one combined stimulus string.
#[derive(Debug, Clone, Default)]
pub struct StimulusParts {
    stimulus_text: Option<String>,
    image_name: Option<String>,
    guidance: Option<String>,
    operation_context: OpsContext,
    template_content: Option<String>,
}

impl StimulusParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the relevant task fields plus the resolved template.
    pub fn from_task(task: &Task, template: Option<&PromptTemplate>) -> Self {
        Self {
            stimulus_text: task.stimulus_text.clone(),
            image_name: task.image_name.clone(),
            guidance: task.guidance.clone(),
            operation_context: task.operation_context.clone(),
            template_content: template.map(|t| t.content.clone()),
        }
    }

    pub fn with_stimulus_text(mut self, text: impl Into<String>) -> Self {
        self.stimulus_text = Some(text.into());
        self
    }

    pub fn with_image_name(mut self, name: impl Into<String>) -> Self {
        self.image_name = Some(name.into());
        self
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    pub fn with_operation_context(mut self, context: OpsContext) -> Self {
        self.operation_context = context;
        self
    }

    pub fn with_template_content(mut self, content: impl Into<String>) -> Self {
        self.template_content = Some(content.into());
        self
    }

    /// Renders the combined stimulus.
    ///
    /// Order: stimulus text (or an image placeholder when only an image is
    /// attached), same-line image annotation, guidance line, ops-context
    /// line, template line. The result is trimmed and never empty.
    pub fn render(&self) -> String {
        let mut base = self
            .stimulus_text
            .as_deref()
            .unwrap_or_default()
            .to_string();
        if let Some(image) = self.image_name.as_deref().filter(|n| !n.is_empty()) {
            if base.is_empty() {
                base = format!("Proposal based on image '{image}'");
            }
            base.push_str(&format!(" (image input: {image})"));
        }
        if let Some(guidance) = self.guidance.as_deref().filter(|g| !g.is_empty()) {
            base.push_str(&format!("\nEvaluation guidance: {guidance}"));
        }
        if let Some(context) = self.operation_context.context_line() {
            base.push_str(&format!("\nOps context: {context}"));
        }
        if let Some(content) = self.template_content.as_deref().filter(|c| !c.is_empty()) {
            base.push_str(&format!("\nPrompt template: {content}"));
        }
        let trimmed = base.trim();
        if trimmed.is_empty() {
            EMPTY_STIMULUS_PLACEHOLDER.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

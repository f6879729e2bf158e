//! Prompt template entity

use crate::core::ids::TemplateId;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// A reusable prompt fragment appended to the combined stimulus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
}

impl PromptTemplate {
    /// Creates a template with the current timestamp.
    pub fn new(id: TemplateId, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            content: content.into(),
            created_at: now_millis(),
        }
    }

    /// Attaches a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

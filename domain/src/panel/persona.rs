//! Persona entity - a simulated survey respondent

use crate::core::ids::PersonaId;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// A simulated respondent profile.
///
/// Personas are referenced by tasks via id, not embedded, so editing a
/// persona after a task completed does not rewrite stored result text but
/// does affect any future re-run of that task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub notes: Option<String>,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
}

impl Persona {
    /// Creates a persona with the current timestamp.
    pub fn new(id: PersonaId, name: impl Into<String>, age: u32, gender: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            gender: gender.into(),
            notes: None,
            created_at: now_millis(),
        }
    }

    /// Attaches free-text notes (play habits, spending profile, ...).
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Short demographic tag used in opinion summaries, e.g. `32/Male`.
    pub fn demographic(&self) -> String {
        format!("{}/{}", self.age, self.gender)
    }
}

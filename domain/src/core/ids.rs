//! Typed identifiers for panel and experiment entities.
//!
//! Identifiers are small integer newtypes so a persona id can never be
//! passed where a criterion id is expected. They serialize as their raw
//! numeric value.

use serde::{Deserialize, Serialize};

/// Unique identifier for an experiment task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a TaskId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonaId(u64);

impl PersonaId {
    /// Creates a PersonaId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PersonaId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an evaluation criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriterionId(u64);

impl CriterionId {
    /// Creates a CriterionId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for CriterionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CriterionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(u64);

impl TemplateId {
    /// Creates a TemplateId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TemplateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a human benchmark row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BenchmarkId(u64);

impl BenchmarkId {
    /// Creates a BenchmarkId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for BenchmarkId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BenchmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = TaskId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");

        let from: PersonaId = 7u64.into();
        assert_eq!(from, PersonaId::new(7));
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&CriterionId::new(3)).unwrap();
        assert_eq!(json, "3");

        let back: CriterionId = serde_json::from_str("3").unwrap();
        assert_eq!(back, CriterionId::new(3));
    }
}

//! Task scoring method selector (Value Object)

use crate::core::error::DomainError;
use crate::scoring::scorer::ScoringMethod;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a task turns opinions into distributions.
///
/// `Uniform`, `Tfidf` and `Embed` use the local deterministic synthesizer
/// for opinion text; `Codex` routes opinion generation to the external
/// responder process and scores the returned text lexically.
///
/// Unknown tags are rejected at task creation, not deep in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskMethod {
    /// Equal 1/5 distribution regardless of text
    Uniform,
    /// Lexical TF-IDF cosine similarity against the anchors
    Tfidf,
    /// Dense sentence-embedding similarity against the anchors
    Embed,
    /// External responder for text, scored with the lexical method
    Codex,
}

impl TaskMethod {
    /// Get the string identifier for this method
    pub fn as_str(&self) -> &str {
        match self {
            TaskMethod::Uniform => "uniform",
            TaskMethod::Tfidf => "tfidf",
            TaskMethod::Embed => "embed",
            TaskMethod::Codex => "codex",
        }
    }

    /// Whether this method calls the external responder process
    pub fn uses_external_responder(&self) -> bool {
        matches!(self, TaskMethod::Codex)
    }

    /// The similarity method actually applied to opinion text.
    ///
    /// External-responder tasks have no scoring method of their own; their
    /// returned text is scored with the lexical method.
    pub fn scoring_method(&self) -> ScoringMethod {
        match self {
            TaskMethod::Uniform => ScoringMethod::Uniform,
            TaskMethod::Tfidf => ScoringMethod::Tfidf,
            TaskMethod::Embed => ScoringMethod::Embed,
            TaskMethod::Codex => ScoringMethod::Tfidf,
        }
    }
}

impl Default for TaskMethod {
    /// Returns the default method (lexical TF-IDF)
    fn default() -> Self {
        TaskMethod::Tfidf
    }
}

impl std::fmt::Display for TaskMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(TaskMethod::Uniform),
            "tfidf" => Ok(TaskMethod::Tfidf),
            "embed" => Ok(TaskMethod::Embed),
            "codex" => Ok(TaskMethod::Codex),
            other => Err(DomainError::UnknownMethod(other.to_string())),
        }
    }
}

impl Serialize for TaskMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_roundtrip() {
        for method in [
            TaskMethod::Uniform,
            TaskMethod::Tfidf,
            TaskMethod::Embed,
            TaskMethod::Codex,
        ] {
            let s = method.to_string();
            let parsed: TaskMethod = s.parse().unwrap();
            assert_eq!(method, parsed);
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = "cosine".parse::<TaskMethod>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownMethod(ref tag) if tag == "cosine"));
    }

    #[test]
    fn test_codex_scores_lexically() {
        assert!(TaskMethod::Codex.uses_external_responder());
        assert_eq!(TaskMethod::Codex.scoring_method(), ScoringMethod::Tfidf);
        assert!(!TaskMethod::Embed.uses_external_responder());
    }

    #[test]
    fn test_method_default() {
        assert_eq!(TaskMethod::default(), TaskMethod::Tfidf);
    }

    #[test]
    fn test_method_deserialize_rejects_unknown() {
        let ok: TaskMethod = serde_json::from_str("\"embed\"").unwrap();
        assert_eq!(ok, TaskMethod::Embed);
        assert!(serde_json::from_str::<TaskMethod>("\"minmax\"").is_err());
    }
}

//! Opinion responder port
//!
//! Defines the interface for producing one persona's free-text opinion.
//! Two adapters exist in the infrastructure layer: the local deterministic
//! synthesizer and the external codex subprocess.

use async_trait::async_trait;
use panel_domain::{OpinionSeed, OpsContext, Persona, synthesize_opinion};
use thiserror::Error;

/// Errors that can occur while generating an opinion
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Responder timed out")]
    TimedOut,

    #[error("Responder failed: {0}")]
    Failed(String),

    #[error("Malformed responder output: {0}")]
    MalformedOutput(String),

    #[error("Failed to spawn responder: {0}")]
    Spawn(String),
}

/// Base64-encoded image handed through to the external responder.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub name: String,
    pub data_b64: String,
}

/// One persona's generation request.
///
/// `stimulus` is the task's combined stimulus string; `guidance`,
/// `template_text`, and `ops_context` are also carried separately because
/// the local synthesizer weaves them into its sentence as distinct
/// clauses.
#[derive(Debug, Clone)]
pub struct OpinionRequest {
    pub persona: Persona,
    /// Criterion framing for the opinion (joined labels when a task has
    /// several criteria)
    pub lens: String,
    pub stimulus: String,
    pub guidance: Option<String>,
    pub template_text: Option<String>,
    pub ops_context: OpsContext,
    pub run_seed: Option<u64>,
    pub image: Option<ImageAttachment>,
}

/// Produces one free-text opinion per request.
///
/// Implementations may block for seconds (external process) and must be
/// dispatched off the orchestrator's scheduling path; the orchestrator
/// awaits them inside persona generation units only.
#[async_trait]
pub trait OpinionResponder: Send + Sync {
    async fn respond(&self, request: &OpinionRequest) -> Result<String, ResponderError>;

    /// Short adapter name for logs and fallback warnings.
    fn name(&self) -> &str;
}

/// Built-in responder backed by the seeded domain synthesizer.
///
/// Serves as the primary responder for offline scoring methods and as the
/// fallback when an external responder fails. Never fails and performs no
/// I/O.
pub struct LocalSynthesizer;

#[async_trait]
impl OpinionResponder for LocalSynthesizer {
    async fn respond(&self, request: &OpinionRequest) -> Result<String, ResponderError> {
        let seed = OpinionSeed::derive(request.run_seed, request.persona.id);
        Ok(synthesize_opinion(
            &request.persona,
            &request.lens,
            &request.stimulus,
            request.guidance.as_deref(),
            request.template_text.as_deref(),
            &request.ops_context,
            seed,
        ))
    }

    fn name(&self) -> &str {
        "local-synthesizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::PersonaId;

    fn request(run_seed: Option<u64>) -> OpinionRequest {
        OpinionRequest {
            persona: Persona::new(PersonaId::new(2), "Core B", 32, "Male"),
            lens: "Retention intent".to_string(),
            stimulus: "New login bonus ladder".to_string(),
            guidance: None,
            template_text: None,
            ops_context: OpsContext::default(),
            run_seed,
            image: None,
        }
    }

    #[tokio::test]
    async fn local_synthesizer_is_deterministic() {
        let responder = LocalSynthesizer;
        let first = responder.respond(&request(Some(42))).await.unwrap();
        let second = responder.respond(&request(Some(42))).await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains("32-year-old Male"));
    }

    #[tokio::test]
    async fn local_synthesizer_varies_with_seed() {
        let responder = LocalSynthesizer;
        let seeds: Vec<String> = {
            let mut out = Vec::new();
            for seed in 0..8u64 {
                out.push(responder.respond(&request(Some(seed))).await.unwrap());
            }
            out
        };
        let distinct: std::collections::HashSet<_> = seeds.iter().collect();
        assert!(distinct.len() > 1, "seeds should change the sentence");
    }
}

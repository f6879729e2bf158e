//! Orchestrator parameters: concurrency and fallback control.
//!
//! [`OrchestratorParams`] groups the static parameters that shape how the
//! [`TaskOrchestrator`](crate::orchestrator::TaskOrchestrator) schedules
//! work. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Concurrency and fallback knobs for task processing.
///
/// `workers` bounds how many tasks are processed at once;
/// `persona_concurrency` bounds fan-out within one task. The product of
/// the two is the ceiling on simultaneously in-flight external responder
/// calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Number of workers pulling from the shared task queue.
    pub workers: usize,
    /// Maximum concurrent persona generation units within one task.
    pub persona_concurrency: usize,
    /// Whether a failed external responder call falls back to the local
    /// synthesizer instead of failing the task.
    pub fallback_enabled: bool,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            workers: 2,
            persona_concurrency: 3,
            fallback_enabled: true,
        }
    }
}

impl OrchestratorParams {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_persona_concurrency(mut self, limit: usize) -> Self {
        self.persona_concurrency = limit.max(1);
        self
    }

    pub fn with_fallback_enabled(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }
}

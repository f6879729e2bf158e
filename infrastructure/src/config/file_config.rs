//! Raw TOML configuration data types
//!
//! These structs mirror the structure of the TOML config file exactly.
//! They deserialize directly and convert into the runtime parameter types
//! the layers consume.

use std::time::Duration;

use panel_application::OrchestratorParams;
use panel_domain::TaskMethod;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codex::{CodexConfig, CodexProtocol};

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("responder timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("responder command cannot be empty")]
    EmptyCommand,

    #[error("evaluation trials cannot be 0")]
    ZeroTrials,
}

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Worker tasks pulling from the shared queue
    pub workers: usize,
    /// Concurrent persona generation units per task
    pub persona_concurrency: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            persona_concurrency: 3,
        }
    }
}

/// Raw responder configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponderConfig {
    /// Codex executable name or path
    pub command: String,
    pub model: String,
    pub sandbox: String,
    pub timeout_secs: u64,
    /// Output protocol: `stream` or `file`
    pub protocol: CodexProtocol,
    /// Fall back to the local synthesizer when the external responder
    /// fails
    pub fallback: bool,
}

impl Default for FileResponderConfig {
    fn default() -> Self {
        Self {
            command: "codex".to_string(),
            model: "gpt-5.1".to_string(),
            sandbox: "danger-full-access".to_string(),
            timeout_secs: 120,
            protocol: CodexProtocol::Stream,
            fallback: true,
        }
    }
}

/// Raw scoring configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScoringConfig {
    /// Default task method (uses domain parsing; unknown tags are
    /// rejected at load time)
    pub method: TaskMethod,
}

/// Raw benchmark evaluation configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEvaluationConfig {
    /// Monte-Carlo repetitions for the attainment estimate
    pub trials: u32,
}

impl Default for FileEvaluationConfig {
    fn default() -> Self {
        Self { trials: 300 }
    }
}

/// Raw archive configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArchiveConfig {
    pub enabled: bool,
    /// Archive root directory, date-partitioned below
    pub root: String,
}

impl Default for FileArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: "sessions".to_string(),
        }
    }
}

/// Complete raw configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub orchestrator: FileOrchestratorConfig,
    pub responder: FileResponderConfig,
    pub scoring: FileScoringConfig,
    pub evaluation: FileEvaluationConfig,
    pub archive: FileArchiveConfig,
}

impl FileConfig {
    /// Rejects values that would wedge a run before any wiring happens.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.responder.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.responder.command.trim().is_empty() {
            return Err(ConfigValidationError::EmptyCommand);
        }
        if self.evaluation.trials == 0 {
            return Err(ConfigValidationError::ZeroTrials);
        }
        Ok(())
    }

    /// Orchestrator and task-processing parameters.
    pub fn orchestrator_params(&self) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_workers(self.orchestrator.workers)
            .with_persona_concurrency(self.orchestrator.persona_concurrency)
            .with_fallback_enabled(self.responder.fallback)
    }

    /// Codex subprocess invocation settings.
    pub fn codex_config(&self) -> CodexConfig {
        CodexConfig {
            command: self.responder.command.clone(),
            model: self.responder.model.clone(),
            sandbox: self.responder.sandbox.clone(),
            timeout: Duration::from_secs(self.responder.timeout_secs),
            protocol: self.responder.protocol,
        }
    }
}

//! Configuration file loading for persona-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./panel.toml` or `./.panel.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/persona-panel/config.toml`
//! 4. Fallback: `~/.config/persona-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileArchiveConfig, FileConfig, FileEvaluationConfig,
    FileOrchestratorConfig, FileResponderConfig, FileScoringConfig,
};
pub use loader::ConfigLoader;

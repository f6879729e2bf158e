//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`OrchestratorParams`] — worker count, persona fan-out, and fallback policy

pub mod orchestrator_params;

pub use orchestrator_params::OrchestratorParams;

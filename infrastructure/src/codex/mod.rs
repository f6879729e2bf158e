//! Codex CLI adapter
//!
//! Implements OpinionResponder over one-shot `codex exec` subprocesses.

pub mod protocol;
pub mod responder;

pub use responder::{CodexConfig, CodexProtocol, CodexResponder};

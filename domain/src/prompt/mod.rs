//! Stimulus assembly and the local deterministic opinion synthesizer.

pub mod stimulus;
pub mod synthesis;

pub use stimulus::StimulusParts;
pub use synthesis::{OpinionSeed, synthesize_opinion};

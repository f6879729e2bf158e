//! Domain layer for persona-panel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Synthetic survey response (SSR)
//!
//! An experiment ("Task") confronts a panel of personas with a stimulus.
//! Each persona produces one free-text opinion, which is scored against
//! every criterion's five Likert anchors into a probability distribution
//! over buckets 1..=5.
//!
//! ## Benchmark validation
//!
//! Aggregated synthetic distributions can be compared against human survey
//! benchmarks with a KS-style similarity and a Monte-Carlo noise-ceiling
//! corrected correlation (attainment).

pub mod core;
pub mod experiment;
pub mod panel;
pub mod prompt;
pub mod scoring;
pub mod util;
pub mod validation;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    ids::{BenchmarkId, CriterionId, PersonaId, TaskId, TemplateId},
};
pub use experiment::{
    method::TaskMethod,
    result::{HumanBenchmark, TaskResult},
    task::{OpsContext, Task, TaskStatus},
};
pub use panel::{
    criterion::{AnchorSet, Criterion},
    persona::Persona,
    template::PromptTemplate,
};
pub use prompt::{
    stimulus::StimulusParts,
    synthesis::{OpinionSeed, synthesize_opinion},
};
pub use scoring::{
    distribution::Distribution,
    scorer::{DistributionScorer, ScoringMethod, SentenceEncoder},
};
pub use validation::{
    attainment::{AttainmentEstimate, correlation_attainment},
    panels::{PanelSummary, aggregate_panels},
    stats::{expected_rating, ks_similarity, pearson},
};

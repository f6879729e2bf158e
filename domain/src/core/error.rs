//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown scoring method: {0}")]
    UnknownMethod(String),

    #[error("Distribution must have exactly 5 entries, got {0}")]
    InvalidArity(usize),

    #[error("Distribution entries must be non-negative, got {0}")]
    NegativeEntry(f64),

    #[error("Anchor set must have exactly 5 entries, got {0}")]
    InvalidAnchorCount(usize),

    #[error("Benchmark sample size must be positive")]
    InvalidSampleSize,

    #[error("Task must reference at least one persona")]
    NoPersonas,

    #[error("Task must reference at least one criterion")]
    NoCriteria,
}

impl DomainError {
    /// Check if this error was raised while validating a distribution
    pub fn is_distribution_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidArity(_) | DomainError::NegativeEntry(_)
        )
    }
}

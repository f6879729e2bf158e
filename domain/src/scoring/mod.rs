//! Opinion-text scoring: TF-IDF vectorization, the distribution value
//! object, and the method-dispatching scorer.

pub mod distribution;
pub mod scorer;
pub mod tfidf;

pub use distribution::Distribution;
pub use scorer::{DistributionScorer, ScoringMethod, SentenceEncoder};

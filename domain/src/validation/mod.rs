//! Benchmark validation: summary statistics, panel aggregation, and the
//! Monte-Carlo correlation-attainment estimate.

pub mod attainment;
pub mod panels;
pub mod stats;

pub use attainment::{AttainmentEstimate, correlation_attainment};
pub use panels::{PanelSummary, aggregate_panels};
pub use stats::{expected_rating, ks_similarity, pearson};

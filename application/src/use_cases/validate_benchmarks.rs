//! Validate Benchmarks use case
//!
//! Matches stored human benchmarks against completed tasks, compares each
//! benchmark's distribution with the panel's aggregated distribution, and
//! estimates how much of the noise-limited correlation ceiling the panel
//! attains.

use crate::ports::repository::{PanelRepository, RepositoryError};
use panel_domain::{
    AttainmentEstimate, BenchmarkId, Criterion, CriterionId, TaskId, TaskStatus,
    aggregate_panels, correlation_attainment, expected_rating, ks_similarity,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the ValidateBenchmarks use case
#[derive(Debug, Clone)]
pub struct ValidateBenchmarksInput {
    /// Monte-Carlo resampling rounds for the attainment estimate
    pub trials: u32,
    /// Seed for reproducible simulations; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl ValidateBenchmarksInput {
    pub const DEFAULT_TRIALS: u32 = 300;

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for ValidateBenchmarksInput {
    fn default() -> Self {
        Self {
            trials: Self::DEFAULT_TRIALS,
            seed: None,
        }
    }
}

/// One benchmark row matched to a completed task's panel.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkMatch {
    pub benchmark_id: BenchmarkId,
    pub task_id: TaskId,
    pub title: String,
    pub session_label: Option<String>,
    pub criterion: String,
    pub ks_similarity: f64,
    pub human_mean: f64,
    pub synthetic_mean: f64,
    /// Number of panel results behind the synthetic distribution
    pub sample_size: usize,
}

/// Matched rows plus the attainment estimate over them.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub matches: Vec<BenchmarkMatch>,
    #[serde(flatten)]
    pub estimate: AttainmentEstimate,
}

impl ValidationReport {
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            estimate: AttainmentEstimate::zero(),
        }
    }
}

/// Use case for validating panel output against human benchmarks
pub struct ValidateBenchmarksUseCase<R: PanelRepository + 'static> {
    repository: Arc<R>,
}

impl<R: PanelRepository + 'static> ValidateBenchmarksUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Builds the validation report.
    ///
    /// Each benchmark is matched against the first completed task it
    /// applies to; benchmarks without a completed task, or whose criterion
    /// has no panel among that task's results, are skipped rather than
    /// failing the run. No stored benchmarks yields the empty report.
    pub async fn execute(
        &self,
        input: ValidateBenchmarksInput,
    ) -> Result<ValidationReport, RepositoryError> {
        let benchmarks = self.repository.benchmarks().await?;
        if benchmarks.is_empty() {
            debug!("No benchmarks stored, returning empty report");
            return Ok(ValidationReport::empty());
        }

        let tasks = self.repository.tasks().await?;
        let criteria: HashMap<CriterionId, Criterion> = self
            .repository
            .criteria()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut matches = Vec::new();
        let mut matched_benchmarks = Vec::new();
        let mut synthetic_means = Vec::new();

        for benchmark in &benchmarks {
            let Some(task) = tasks.iter().find(|t| {
                t.status == TaskStatus::Completed
                    && benchmark.matches_task(&t.title, t.session_label.as_deref())
            }) else {
                debug!("Benchmark {} has no completed task", benchmark.id);
                continue;
            };

            let results = self.repository.results_for_task(task.id).await?;
            let panels = aggregate_panels(&results, &criteria);
            let Some(panel) = panels.get(&benchmark.criterion_label) else {
                debug!(
                    "Benchmark {} matched task {} but criterion \"{}\" has no panel",
                    benchmark.id, task.id, benchmark.criterion_label
                );
                continue;
            };

            matches.push(BenchmarkMatch {
                benchmark_id: benchmark.id,
                task_id: task.id,
                title: task.title.clone(),
                session_label: benchmark.session_label.clone(),
                criterion: benchmark.criterion_label.clone(),
                ks_similarity: ks_similarity(&panel.distribution, &benchmark.distribution),
                human_mean: expected_rating(&benchmark.distribution),
                synthetic_mean: panel.mean_rating,
                sample_size: panel.sample_size,
            });
            matched_benchmarks.push(benchmark.clone());
            synthetic_means.push(panel.mean_rating);
        }

        let estimate =
            correlation_attainment(&matched_benchmarks, &synthetic_means, input.trials, input.seed);

        info!(
            "Validated {} of {} benchmarks (attainment {:.3}, ceiling {:.3})",
            matches.len(),
            benchmarks.len(),
            estimate.attainment,
            estimate.ceiling
        );

        Ok(ValidationReport { matches, estimate })
    }
}

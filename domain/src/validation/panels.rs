//! Per-criterion aggregation of task results into panel summaries.

use crate::core::ids::CriterionId;
use crate::experiment::result::TaskResult;
use crate::panel::criterion::Criterion;
use crate::scoring::distribution::Distribution;
use crate::validation::stats::expected_rating;
use serde::Serialize;
use std::collections::HashMap;

/// Averaged view of every persona's distribution for one criterion.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSummary {
    pub criterion: String,
    pub distribution: Distribution,
    pub mean_rating: f64,
    pub sample_size: usize,
}

/// Groups results by criterion label and averages their normalized
/// distributions. Results whose criterion id is not in `criteria` are
/// skipped.
pub fn aggregate_panels(
    results: &[TaskResult],
    criteria: &HashMap<CriterionId, Criterion>,
) -> HashMap<String, PanelSummary> {
    let mut grouped: HashMap<String, Vec<Distribution>> = HashMap::new();
    for result in results {
        let Some(criterion) = criteria.get(&result.criterion_id) else {
            continue;
        };
        grouped
            .entry(criterion.label.clone())
            .or_default()
            .push(result.distribution.clone());
    }

    grouped
        .into_iter()
        .filter_map(|(label, distributions)| {
            let averaged = Distribution::average(&distributions)?;
            let mean_rating = expected_rating(&averaged);
            let summary = PanelSummary {
                criterion: label.clone(),
                distribution: averaged,
                mean_rating,
                sample_size: distributions.len(),
            };
            Some((label, summary))
        })
        .collect()
}

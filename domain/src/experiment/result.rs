//! Persisted experiment outcomes and human benchmark reference rows

use crate::core::error::DomainError;
use crate::core::ids::{BenchmarkId, CriterionId, PersonaId, TaskId};
use crate::scoring::distribution::Distribution;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// One persona×criterion outcome for a task.
///
/// Created only by the orchestrator once a task's whole generation batch
/// succeeded; never mutated afterwards. The rating is derived from the
/// distribution at construction so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub persona_id: PersonaId,
    pub criterion_id: CriterionId,
    /// `<persona> (<age>/<gender>) evaluated <criterion>. <opinion>`
    pub summary: String,
    pub distribution: Distribution,
    /// 1-indexed arg-max of the distribution
    pub rating: u8,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
}

impl TaskResult {
    /// Creates a result; the rating is computed from the distribution.
    pub fn new(
        task_id: TaskId,
        persona_id: PersonaId,
        criterion_id: CriterionId,
        summary: impl Into<String>,
        distribution: Distribution,
    ) -> Self {
        let rating = distribution.rating();
        Self {
            task_id,
            persona_id,
            criterion_id,
            summary: summary.into(),
            distribution,
            rating,
            created_at: now_millis(),
        }
    }
}

/// Independently collected human reference distribution for a criterion.
///
/// Matched against completed tasks by session label when present, else by
/// benchmark label equal to the task title. The sample size is the
/// simulated poll size for the attainment estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanBenchmark {
    pub id: BenchmarkId,
    pub label: String,
    pub session_label: Option<String>,
    pub criterion_label: String,
    /// Stored normalized (sums to 1)
    pub distribution: Distribution,
    pub sample_size: u32,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
}

impl HumanBenchmark {
    /// Default simulated poll size when the source omits one.
    pub const DEFAULT_SAMPLE_SIZE: u32 = 100;

    /// Validates and normalizes an externally supplied benchmark row.
    ///
    /// Rejects distributions of the wrong arity (or with negative entries)
    /// and non-positive sample sizes before any correlation computation
    /// can see them.
    pub fn new(
        id: BenchmarkId,
        label: impl Into<String>,
        session_label: Option<String>,
        criterion_label: impl Into<String>,
        distribution: Vec<f64>,
        sample_size: Option<u32>,
    ) -> Result<Self, DomainError> {
        let distribution = Distribution::try_from_vec(distribution)?.normalized();
        let sample_size = sample_size.unwrap_or(Self::DEFAULT_SAMPLE_SIZE);
        if sample_size == 0 {
            return Err(DomainError::InvalidSampleSize);
        }
        Ok(Self {
            id,
            label: label.into(),
            session_label,
            criterion_label: criterion_label.into(),
            distribution,
            sample_size,
            created_at: now_millis(),
        })
    }

    /// Whether this benchmark applies to the given task identifiers:
    /// session labels match when the benchmark has one, otherwise the
    /// benchmark label must equal the task title.
    pub fn matches_task(&self, task_title: &str, task_session_label: Option<&str>) -> bool {
        match &self.session_label {
            Some(session) => task_session_label == Some(session.as_str()),
            None => self.label == task_title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_rating_matches_distribution() {
        let dist = Distribution::try_new([0.1, 0.1, 0.2, 0.3, 0.3]).unwrap();
        let result = TaskResult::new(
            TaskId::new(1),
            PersonaId::new(2),
            CriterionId::new(3),
            "Core B (32/Male) evaluated Spend intent. Looks promising.",
            dist,
        );
        assert_eq!(result.rating, 4);
        assert_eq!(result.rating, result.distribution.rating());
    }

    #[test]
    fn test_benchmark_rejects_wrong_arity() {
        let err = HumanBenchmark::new(
            BenchmarkId::new(1),
            "June survey",
            None,
            "Retention intent",
            vec![0.5, 0.5],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArity(2)));
    }

    #[test]
    fn test_benchmark_normalizes_distribution() {
        let b = HumanBenchmark::new(
            BenchmarkId::new(1),
            "June survey",
            None,
            "Retention intent",
            vec![1.0, 1.0, 2.0, 3.0, 3.0],
            Some(50),
        )
        .unwrap();
        assert!((b.distribution.sum() - 1.0).abs() < 1e-9);
        assert_eq!(b.distribution.values()[0], 0.1);
        assert_eq!(b.sample_size, 50);
    }

    #[test]
    fn test_benchmark_default_sample_size() {
        let b = HumanBenchmark::new(
            BenchmarkId::new(1),
            "June survey",
            None,
            "Retention intent",
            vec![0.2; 5],
            None,
        )
        .unwrap();
        assert_eq!(b.sample_size, HumanBenchmark::DEFAULT_SAMPLE_SIZE);
    }

    #[test]
    fn test_benchmark_rejects_zero_sample_size() {
        let err = HumanBenchmark::new(
            BenchmarkId::new(1),
            "June survey",
            None,
            "Retention intent",
            vec![0.2; 5],
            Some(0),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSampleSize));
    }

    #[test]
    fn test_benchmark_matching_rules() {
        let by_session = HumanBenchmark::new(
            BenchmarkId::new(1),
            "whatever",
            Some("samples-20250801".to_string()),
            "Retention intent",
            vec![0.2; 5],
            None,
        )
        .unwrap();
        assert!(by_session.matches_task("unrelated title", Some("samples-20250801")));
        assert!(!by_session.matches_task("whatever", None));

        let by_title = HumanBenchmark::new(
            BenchmarkId::new(2),
            "Summer festival gacha",
            None,
            "Retention intent",
            vec![0.2; 5],
            None,
        )
        .unwrap();
        assert!(by_title.matches_task("Summer festival gacha", Some("ignored")));
        assert!(!by_title.matches_task("Autumn rerun", None));
    }
}

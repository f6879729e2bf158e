//! Five-bucket Likert probability distribution (Value Object)

use crate::core::error::DomainError;
use crate::panel::criterion::LIKERT_BUCKETS;
use serde::{Deserialize, Deserializer, Serialize};

/// A probability vector over Likert buckets 1..=5.
///
/// Entries are finite and non-negative; a stored distribution sums to ~1
/// (within floating tolerance, after 4-decimal rounding). The bucket order
/// follows the anchor order: index 0 is the lowest-endorsement bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution([f64; LIKERT_BUCKETS]);

impl Distribution {
    /// Wraps raw bucket values, rejecting non-finite or negative entries.
    pub fn try_new(values: [f64; LIKERT_BUCKETS]) -> Result<Self, DomainError> {
        for &v in &values {
            if !v.is_finite() {
                return Err(DomainError::NegativeEntry(v));
            }
            if v < 0.0 {
                return Err(DomainError::NegativeEntry(v));
            }
        }
        Ok(Self(values))
    }

    /// Builds a distribution from a vector, rejecting any arity other
    /// than 5 before the entry checks.
    pub fn try_from_vec(values: Vec<f64>) -> Result<Self, DomainError> {
        let len = values.len();
        let arr: [f64; LIKERT_BUCKETS] = values
            .try_into()
            .map_err(|_| DomainError::InvalidArity(len))?;
        Self::try_new(arr)
    }

    /// The equal 1/5 distribution.
    pub fn uniform() -> Self {
        Self([1.0 / LIKERT_BUCKETS as f64; LIKERT_BUCKETS])
    }

    /// Raw bucket values, lowest bucket first.
    pub fn values(&self) -> &[f64; LIKERT_BUCKETS] {
        &self.0
    }

    /// Sum of all bucket values.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Discrete rating in 1..=5: the 1-indexed arg-max, ties broken by
    /// first occurrence so the lowest bucket wins.
    pub fn rating(&self) -> u8 {
        let mut best = 0usize;
        for (idx, &v) in self.0.iter().enumerate() {
            if v > self.0[best] {
                best = idx;
            }
        }
        (best + 1) as u8
    }

    /// Rescales to sum 1. A distribution summing to zero (or below, which
    /// cannot arise from a validated instance) becomes uniform.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return Self::uniform();
        }
        Self(self.0.map(|v| v / total))
    }

    /// Rounds every bucket to 4 decimal places for reproducible storage.
    pub fn rounded(&self) -> Self {
        Self(self.0.map(|v| (v * 10_000.0).round() / 10_000.0))
    }

    /// Elementwise average of the normalized forms, the synthetic side of
    /// panel aggregation. `None` for an empty slice.
    pub fn average(distributions: &[Distribution]) -> Option<Self> {
        if distributions.is_empty() {
            return None;
        }
        let mut summed = [0.0f64; LIKERT_BUCKETS];
        for dist in distributions {
            for (idx, v) in dist.normalized().0.iter().enumerate() {
                summed[idx] += v;
            }
        }
        let count = distributions.len() as f64;
        Some(Self(summed.map(|v| v / count)))
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        Distribution::try_from_vec(values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_valid() {
        let d = Distribution::uniform();
        assert!((d.sum() - 1.0).abs() < 1e-3);
        assert!(d.values().iter().all(|&v| v >= 0.0));
        assert_eq!(d.values(), &[0.2, 0.2, 0.2, 0.2, 0.2]);
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let err = Distribution::try_from_vec(vec![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArity(2)));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(Distribution::try_new([0.5, -0.1, 0.2, 0.2, 0.2]).is_err());
        assert!(Distribution::try_new([f64::NAN, 0.2, 0.2, 0.2, 0.2]).is_err());
        assert!(Distribution::try_new([f64::INFINITY, 0.2, 0.2, 0.2, 0.2]).is_err());
    }

    #[test]
    fn test_rating_is_one_indexed_argmax() {
        let d = Distribution::try_new([0.1, 0.2, 0.1, 0.5, 0.1]).unwrap();
        assert_eq!(d.rating(), 4);
    }

    #[test]
    fn test_rating_ties_take_lowest_bucket() {
        let d = Distribution::try_new([0.3, 0.3, 0.2, 0.1, 0.1]).unwrap();
        assert_eq!(d.rating(), 1);
        assert_eq!(Distribution::uniform().rating(), 1);
    }

    #[test]
    fn test_normalize_rescales_to_one() {
        let d = Distribution::try_new([2.0, 2.0, 2.0, 2.0, 2.0]).unwrap();
        let n = d.normalized();
        assert!((n.sum() - 1.0).abs() < 1e-9);
        assert_eq!(n.values(), &[0.2, 0.2, 0.2, 0.2, 0.2]);
    }

    #[test]
    fn test_normalize_zero_sum_becomes_uniform() {
        let d = Distribution::try_new([0.0; 5]).unwrap();
        assert_eq!(d.normalized(), Distribution::uniform());
    }

    #[test]
    fn test_rounding_keeps_sum_close_to_one() {
        let d = Distribution::try_new([0.123456, 0.2, 0.3, 0.25, 0.126544])
            .unwrap()
            .rounded();
        assert_eq!(d.values()[0], 0.1235);
        assert!((d.sum() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_average_of_normalized_forms() {
        let a = Distribution::try_new([1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let b = Distribution::try_new([0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
        let avg = Distribution::average(&[a, b]).unwrap();
        assert_eq!(avg.values(), &[0.5, 0.5, 0.0, 0.0, 0.0]);
        assert!(Distribution::average(&[]).is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Distribution = serde_json::from_str("[0.2,0.2,0.2,0.2,0.2]").unwrap();
        assert_eq!(ok, Distribution::uniform());
        assert!(serde_json::from_str::<Distribution>("[0.5,0.5]").is_err());
        assert!(serde_json::from_str::<Distribution>("[0.5,-0.5,0.4,0.3,0.3]").is_err());
    }
}

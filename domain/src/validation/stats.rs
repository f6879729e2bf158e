//! Summary statistics shared by benchmark validation.

use crate::scoring::distribution::Distribution;
use rand::Rng;
use rand::distr::Distribution as _;
use rand::distr::weighted::WeightedIndex;

/// Pearson correlation coefficient. Mismatched lengths, empty input, and
/// zero variance on either side all yield 0.0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }
    if variance_x <= 0.0 || variance_y <= 0.0 {
        return 0.0;
    }
    covariance / (variance_x.sqrt() * variance_y.sqrt())
}

/// Probability-weighted mean rating on the 1..=5 scale.
pub fn expected_rating(distribution: &Distribution) -> f64 {
    distribution
        .normalized()
        .values()
        .iter()
        .enumerate()
        .map(|(index, p)| (index as f64 + 1.0) * p)
        .sum()
}

/// Kolmogorov-Smirnov similarity between two distributions: one minus the
/// largest gap between their cumulative curves, floored at zero. Identical
/// shapes score 1.0.
pub fn ks_similarity(synthetic: &Distribution, human: &Distribution) -> f64 {
    let a = synthetic.normalized();
    let b = human.normalized();
    let mut cumulative_a = 0.0;
    let mut cumulative_b = 0.0;
    let mut widest_gap = 0.0f64;
    for (pa, pb) in a.values().iter().zip(b.values().iter()) {
        cumulative_a += pa;
        cumulative_b += pb;
        widest_gap = widest_gap.max((cumulative_a - cumulative_b).abs());
    }
    (1.0 - widest_gap).max(0.0)
}

/// Mean of `sample_size` weighted rating draws, where bucket index `i`
/// maps to rating `i + 1`. A zero sample size yields 0.0.
pub fn simulated_mean<R: Rng>(
    sampler: &WeightedIndex<f64>,
    sample_size: u32,
    rng: &mut R,
) -> f64 {
    if sample_size == 0 {
        return 0.0;
    }
    let total: u64 = (0..sample_size)
        .map(|_| sampler.sample(rng) as u64 + 1)
        .sum();
    total as f64 / f64::from(sample_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn pearson_detects_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &up) - 1.0).abs() < 1e-9);
        assert!((pearson(&x, &down) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_degenerate_inputs_are_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn expected_rating_of_uniform_is_midpoint() {
        assert!((expected_rating(&Distribution::uniform()) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn expected_rating_normalizes_first() {
        let d = Distribution::try_new([0.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        assert!((expected_rating(&d) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn ks_similarity_identical_is_one() {
        let d = Distribution::try_new([0.1, 0.2, 0.3, 0.2, 0.2]).unwrap();
        assert!((ks_similarity(&d, &d) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ks_similarity_opposite_extremes_is_zero() {
        let low = Distribution::try_new([1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let high = Distribution::try_new([0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(ks_similarity(&low, &high).abs() < 1e-9);
    }

    #[test]
    fn ks_similarity_is_symmetric() {
        let a = Distribution::try_new([0.4, 0.3, 0.1, 0.1, 0.1]).unwrap();
        let b = Distribution::try_new([0.1, 0.1, 0.2, 0.3, 0.3]).unwrap();
        assert!((ks_similarity(&a, &b) - ks_similarity(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn simulated_mean_of_point_mass_is_exact() {
        let sampler = WeightedIndex::new([0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!((simulated_mean(&sampler, 40, &mut rng) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn simulated_mean_zero_samples_is_zero() {
        let sampler = WeightedIndex::new([0.2; 5]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(simulated_mean(&sampler, 0, &mut rng), 0.0);
    }
}

//! Opinion-text → distribution scorer

use crate::panel::criterion::{AnchorSet, LIKERT_BUCKETS};
use crate::scoring::distribution::Distribution;
use crate::scoring::tfidf;
use std::sync::Arc;

/// Placeholder fed to vectorization when an opinion is empty, so the
/// pipeline never sees an empty string.
pub const EMPTY_TEXT_PLACEHOLDER: &str = "(no text)";

/// Similarity method applied to opinion text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMethod {
    /// Equal 1/5 distribution regardless of text
    Uniform,
    /// TF-IDF cosine similarity against each anchor
    Tfidf,
    /// Dense sentence-embedding dot product against each anchor
    Embed,
}

/// Dense sentence embedding source for [`ScoringMethod::Embed`].
///
/// Implementations return one vector per input text and are expected to
/// l2-normalize, so a dot product is a cosine similarity. Heavy models
/// should initialize lazily on first `encode` call; the scorer holds the
/// encoder behind an `Arc` and never triggers initialization for lexical
/// methods.
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, texts: &[String]) -> Vec<Vec<f64>>;
}

/// Maps (opinion text, anchor set) to a 5-bucket probability distribution.
///
/// Raw similarities go through a numerically stabilized softmax, and the
/// result is rounded to 4 decimals for reproducible storage. Degenerate
/// similarity vectors fall back to the uniform distribution.
pub struct DistributionScorer {
    encoder: Arc<dyn SentenceEncoder>,
}

impl DistributionScorer {
    pub fn new(encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self { encoder }
    }

    /// Collapses newlines to spaces and trims; empty text becomes a
    /// literal placeholder token.
    pub fn normalize_text(text: &str) -> String {
        let cleaned = text.replace('\n', " ");
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            EMPTY_TEXT_PLACEHOLDER.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Scores one opinion against the five anchors.
    pub fn score(&self, text: &str, anchors: &AnchorSet, method: ScoringMethod) -> Distribution {
        if method == ScoringMethod::Uniform {
            return Distribution::uniform();
        }

        let mut documents: Vec<String> = anchors.iter().map(Self::normalize_text).collect();
        documents.push(Self::normalize_text(text));

        let similarities = match method {
            ScoringMethod::Uniform => unreachable!("handled above"),
            ScoringMethod::Tfidf => Self::lexical_similarities(&documents),
            ScoringMethod::Embed => self.embedding_similarities(&documents),
        };

        match similarities {
            Some(sims) => softmax_distribution(sims),
            None => Distribution::uniform(),
        }
    }

    fn lexical_similarities(documents: &[String]) -> Option<[f64; LIKERT_BUCKETS]> {
        let vectors = tfidf::tfidf_vectors(documents);
        let (stimulus, references) = vectors.split_last()?;
        let mut sims = [0.0f64; LIKERT_BUCKETS];
        for (index, reference) in references.iter().take(LIKERT_BUCKETS).enumerate() {
            sims[index] = tfidf::cosine(stimulus, reference);
        }
        Some(sims)
    }

    fn embedding_similarities(&self, documents: &[String]) -> Option<[f64; LIKERT_BUCKETS]> {
        let embeddings = self.encoder.encode(documents);
        if embeddings.len() != documents.len() {
            return None;
        }
        let (stimulus, references) = embeddings.split_last()?;
        let mut sims = [0.0f64; LIKERT_BUCKETS];
        for (index, reference) in references.iter().take(LIKERT_BUCKETS).enumerate() {
            sims[index] = dot(stimulus, reference);
        }
        Some(sims)
    }
}

/// Numerically stabilized softmax over raw similarities, rounded for
/// storage. Anything degenerate (NaN scores, zero total) becomes uniform.
fn softmax_distribution(similarities: [f64; LIKERT_BUCKETS]) -> Distribution {
    let max = similarities.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    if !max.is_finite() {
        return Distribution::uniform();
    }
    let exponentiated = similarities.map(|s| (s - max).exp());
    let total: f64 = exponentiated.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Distribution::uniform();
    }
    Distribution::try_new(exponentiated.map(|v| v / total))
        .map(|d| d.rounded())
        .unwrap_or_else(|_| Distribution::uniform())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::criterion::DEFAULT_ANCHORS;

    /// Encoder double that maps each known text to a fixed unit vector.
    struct FixedEncoder;

    impl SentenceEncoder for FixedEncoder {
        fn encode(&self, texts: &[String]) -> Vec<Vec<f64>> {
            texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0; 6];
                    let slot = match t.as_str() {
                        "never again" => 0,
                        "probably not" => 1,
                        "cannot say" => 2,
                        "quite likely" => 3,
                        "absolutely yes" => 4,
                        _ => 5,
                    };
                    v[slot] = 1.0;
                    // the stimulus leans toward bucket 4
                    if slot == 5 {
                        v[3] = 0.9;
                        v[5] = 0.1;
                    }
                    v
                })
                .collect()
        }
    }

    fn scorer() -> DistributionScorer {
        DistributionScorer::new(Arc::new(FixedEncoder))
    }

    fn default_anchors() -> AnchorSet {
        AnchorSet::from_slices(DEFAULT_ANCHORS)
    }

    #[test]
    fn uniform_ignores_text() {
        let s = scorer();
        for text in ["", "anything at all", "プレイを継続しない"] {
            let d = s.score(text, &default_anchors(), ScoringMethod::Uniform);
            assert_eq!(d.values(), &[0.2, 0.2, 0.2, 0.2, 0.2]);
            assert_eq!(d.rating(), 1);
        }
    }

    #[test]
    fn tfidf_stimulus_equal_to_fourth_anchor_rates_four() {
        let s = scorer();
        let d = s.score(DEFAULT_ANCHORS[3], &default_anchors(), ScoringMethod::Tfidf);
        assert_eq!(d.rating(), 4);
        assert!((d.sum() - 1.0).abs() < 1e-3);
        assert!(d.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn tfidf_empty_text_still_yields_valid_distribution() {
        let s = scorer();
        let d = s.score("", &default_anchors(), ScoringMethod::Tfidf);
        assert!((d.sum() - 1.0).abs() < 1e-3);
        assert!(d.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn embed_follows_encoder_similarity() {
        let s = scorer();
        let anchors = AnchorSet::from_slices([
            "never again",
            "probably not",
            "cannot say",
            "quite likely",
            "absolutely yes",
        ]);
        let d = s.score("some player opinion", &anchors, ScoringMethod::Embed);
        assert_eq!(d.rating(), 4);
        assert!((d.sum() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn normalize_text_collapses_newlines() {
        assert_eq!(
            DistributionScorer::normalize_text("line one\nline two\n"),
            "line one line two"
        );
        assert_eq!(DistributionScorer::normalize_text("  \n "), EMPTY_TEXT_PLACEHOLDER);
    }

    #[test]
    fn softmax_is_stable_for_large_scores() {
        let d = softmax_distribution([1000.0, 1000.0, 1000.0, 1000.0, 1001.0]);
        assert!((d.sum() - 1.0).abs() < 1e-3);
        assert_eq!(d.rating(), 5);
    }

    #[test]
    fn softmax_degenerate_scores_become_uniform() {
        let d = softmax_distribution([f64::NAN; 5]);
        assert_eq!(d, Distribution::uniform());
    }
}

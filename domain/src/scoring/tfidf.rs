//! Lexical TF-IDF vectorization over a small joint document set.
//!
//! Vocabulary, document frequencies and idf weights are computed jointly
//! over the five anchors plus the opinion text, so every scoring call sees
//! a self-contained corpus. Idf uses the smoothed form
//! `ln((1 + n) / (1 + df)) + 1` and vectors are l2-normalized.

use std::collections::{BTreeMap, HashSet};

/// Lowercased word tokens of at least two word characters. Underscores
/// count as word characters; everything else separates tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectors for `docs`, one dense vector per document over the
/// joint vocabulary (terms in sorted order).
pub fn tfidf_vectors(docs: &[String]) -> Vec<Vec<f64>> {
    let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(d)).collect();

    // Sorted vocabulary keeps the vector layout deterministic
    let mut vocabulary: BTreeMap<&str, usize> = tokenized
        .iter()
        .flat_map(|tokens| tokens.iter().map(|t| (t.as_str(), 0)))
        .collect();
    for (position, (_, index)) in vocabulary.iter_mut().enumerate() {
        *index = position;
    }

    let doc_count = docs.len() as f64;
    let mut document_frequency = vec![0usize; vocabulary.len()];
    for tokens in &tokenized {
        let mut seen: HashSet<&str> = HashSet::new();
        for token in tokens {
            if seen.insert(token.as_str())
                && let Some(&index) = vocabulary.get(token.as_str())
            {
                document_frequency[index] += 1;
            }
        }
    }

    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + doc_count) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    tokenized
        .iter()
        .map(|tokens| {
            let mut vector = vec![0.0f64; vocabulary.len()];
            for token in tokens {
                if let Some(&index) = vocabulary.get(token.as_str()) {
                    vector[index] += 1.0;
                }
            }
            for (index, value) in vector.iter_mut().enumerate() {
                *value *= idf[index];
            }
            l2_normalize(&mut vector);
            vector
        })
        .collect()
}

/// Cosine similarity; 0 when either vector has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn l2_normalize(vector: &mut [f64]) {
    let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

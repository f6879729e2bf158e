//! Hashed-feature sentence encoder.
//!
//! Deterministic stand-in for a neural sentence embedder: word tokens are
//! hashed into a fixed-width signed feature vector, l2-normalized so dot
//! products behave like cosine similarity. Shares its token rules with
//! the lexical scoring path.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::OnceLock;

use panel_domain::SentenceEncoder;
use panel_domain::scoring::tfidf::tokenize;
use tracing::debug;

/// Default feature-vector width. Wide enough that the short survey
/// sentences this system scores rarely collide.
pub const DEFAULT_DIMS: usize = 256;

/// Per-token hash seeds, fixed at first use.
///
/// This is the point where a heavyweight encoder would load its model;
/// the lock keeps initialization single-shot under concurrent scoring.
#[derive(Debug, Clone, Copy)]
struct HashSeeds {
    bucket: u64,
    sign: u64,
}

impl HashSeeds {
    fn derive(dims: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        "persona-panel.hash-encoder".hash(&mut hasher);
        dims.hash(&mut hasher);
        let base = hasher.finish();
        Self {
            bucket: base,
            sign: base.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15,
        }
    }
}

/// [`SentenceEncoder`] backed by signed feature hashing.
pub struct HashEncoder {
    dims: usize,
    seeds: OnceLock<HashSeeds>,
}

impl HashEncoder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
            seeds: OnceLock::new(),
        }
    }

    fn seeds(&self) -> HashSeeds {
        *self.seeds.get_or_init(|| {
            debug!("Initializing hash encoder ({} dims)", self.dims);
            HashSeeds::derive(self.dims)
        })
    }

    /// One l2-normalized vector per text. Texts with no usable tokens
    /// encode to the zero vector, which dots to zero against everything.
    fn encode_one(&self, text: &str, seeds: HashSeeds) -> Vec<f64> {
        let mut vector = vec![0.0f64; self.dims];
        for token in tokenize(text) {
            let bucket = seeded_hash(seeds.bucket, &token) as usize % self.dims;
            let sign = if seeded_hash(seeds.sign, &token) & 1 == 0 {
                1.0
            } else {
                -1.0
            };
            vector[bucket] += sign;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMS)
    }
}

impl SentenceEncoder for HashEncoder {
    fn encode(&self, texts: &[String]) -> Vec<Vec<f64>> {
        let seeds = self.seeds();
        texts
            .iter()
            .map(|text| self.encode_one(text, seeds))
            .collect()
    }
}

fn seeded_hash(seed: u64, token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_u64(seed);
    token.hash(&mut hasher);
    hasher.finish()
}

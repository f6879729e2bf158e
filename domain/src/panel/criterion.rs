//! Criterion entity and the five-anchor Likert scale attached to it

use crate::core::error::DomainError;
use crate::core::ids::CriterionId;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Number of Likert buckets. Every distribution, anchor set and rating in
/// the system is defined over exactly this many ordered buckets.
pub const LIKERT_BUCKETS: usize = 5;

/// Default anchor set, phrased for liveops retention evaluation. Substituted
/// when a criterion is created without anchors.
pub const DEFAULT_ANCHORS: [&str; LIKERT_BUCKETS] = [
    "I would not keep playing after this initiative.",
    "It is not quite appealing enough to stay with for long.",
    "I cannot say either way; it depends on how the operations go.",
    "It is fairly good, so I would like to keep playing for a while.",
    "It is very appealing and I want to keep playing actively.",
];

/// Exactly five anchor texts, ordered from lowest to highest endorsement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSet([String; LIKERT_BUCKETS]);

impl AnchorSet {
    /// Builds an anchor set from a vector, rejecting any arity other than 5.
    pub fn new(anchors: Vec<String>) -> Result<Self, DomainError> {
        let len = anchors.len();
        let arr: [String; LIKERT_BUCKETS] = anchors
            .try_into()
            .map_err(|_| DomainError::InvalidAnchorCount(len))?;
        Ok(Self(arr))
    }

    /// Builds an anchor set from a fixed-size array of string slices.
    /// Arity is enforced by the type, so this cannot fail.
    pub fn from_slices(anchors: [&str; LIKERT_BUCKETS]) -> Self {
        Self(anchors.map(String::from))
    }

    /// Anchor text for a zero-based bucket index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// All anchors, lowest endorsement first.
    pub fn texts(&self) -> &[String; LIKERT_BUCKETS] {
        &self.0
    }

    /// Iterator over anchor texts.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AnchorSet {
    fn default() -> Self {
        Self::from_slices(DEFAULT_ANCHORS)
    }
}

/// An evaluation axis: one question with a five-anchor Likert scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub label: String,
    pub question: String,
    pub anchors: AnchorSet,
    /// Creation time, epoch milliseconds
    pub created_at: u64,
}

impl Criterion {
    /// Creates a criterion; `anchors = None` substitutes the default set.
    pub fn new(
        id: CriterionId,
        label: impl Into<String>,
        question: impl Into<String>,
        anchors: Option<AnchorSet>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            question: question.into(),
            anchors: anchors.unwrap_or_default(),
            created_at: now_millis(),
        }
    }
}

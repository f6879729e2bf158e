//! Local deterministic opinion synthesizer.
//!
//! The synthesizer is both the offline generation path and the fallback
//! when an external responder fails. Output is a single sentence seeded by
//! (run seed, persona id), so re-running a task with the same seed
//! reproduces every opinion exactly. The sentence embeds a stance clue
//! drawn from a Likert-aligned vocabulary, which gives the lexical scorer
//! real signal to latch onto.

use crate::core::ids::PersonaId;
use crate::experiment::task::OpsContext;
use crate::panel::criterion::{DEFAULT_ANCHORS, LIKERT_BUCKETS};
use crate::panel::persona::Persona;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Stance vocabulary substituted when the criterion lens is about
/// spending.
pub const SPEND_STANCES: [&str; LIKERT_BUCKETS] = [
    "I have no intention of spending at all.",
    "I would rather not spend unless there is a deep discount.",
    "Depending on conditions I might spend a small amount.",
    "If the rewards hold up I would pay for passes or pulls.",
    "I want to spend actively on premium options to progress faster.",
];

const LEADS: [&str; 8] = [
    "From my point of view",
    "Intuitively",
    "Frankly",
    "As a player",
    "Based on my habits",
    "Considering well-being",
    "As a gamer",
    "From how I play social games",
];

const OPINIONS: [&str; 9] = [
    "it seems useful",
    "pricing will decide it",
    "I want to try it",
    "I'd weigh it carefully",
    "it has appeal",
    "it feels promising",
    "there are challenges",
    "sustained support seems key",
    "timing of releases will sway me",
];

/// Deterministic seed for one persona's synthesized opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpinionSeed(u64);

impl OpinionSeed {
    /// Combines the task-level run seed (0 when unset) with the persona
    /// id, so each persona gets a distinct but reproducible stream.
    pub fn derive(run_seed: Option<u64>, persona: PersonaId) -> Self {
        Self(run_seed.unwrap_or(0).wrapping_add(persona.value()))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Synthesizes one opinion sentence for a persona.
///
/// `lens` is the criterion framing the opinion; a spend-flavored lens
/// switches the stance vocabulary. Draw order is fixed (stance, lead,
/// opinion) so a given seed always lands on the same sentence.
pub fn synthesize_opinion(
    persona: &Persona,
    lens: &str,
    stimulus: &str,
    guidance: Option<&str>,
    template_text: Option<&str>,
    ops_context: &OpsContext,
    seed: OpinionSeed,
) -> String {
    let mut rng = StdRng::seed_from_u64(seed.value());
    let stance_index = rng.random_range(1..=LIKERT_BUCKETS);
    let stance_phrase = stance_vocabulary(lens)[stance_index - 1];
    let lead = LEADS[rng.random_range(0..LEADS.len())];
    let opinion = OPINIONS[rng.random_range(0..OPINIONS.len())];

    let mut sentence = format!(
        "{lead}, viewing this as a {age}-year-old {gender}. {stimulus}",
        age = persona.age,
        gender = persona.gender,
    );
    if let Some(guidance) = guidance.filter(|g| !g.is_empty()) {
        sentence.push(' ');
        sentence.push_str(guidance);
    }
    if let Some(template) = template_text.filter(|t| !t.is_empty()) {
        sentence.push(' ');
        sentence.push_str(template);
    }
    let context = ops_context.context_line().unwrap_or_default();
    sentence.push_str(&format!(
        " As a result, from the lens of {lens} I feel {opinion}. \
         Ops context: {context}. Likert stance clue: {stance_phrase} \
         (rating seed {stance_index})."
    ));
    sentence.trim().to_string()
}

/// Spend-flavored lenses get the spending stances; everything else gets
/// the game-ops set shared with the default criterion anchors.
fn stance_vocabulary(lens: &str) -> [&'static str; LIKERT_BUCKETS] {
    if lens.to_lowercase().contains("spend") {
        SPEND_STANCES
    } else {
        DEFAULT_ANCHORS
    }
}

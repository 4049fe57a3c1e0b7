//! Template justifications
//!
//! Five sentences per tone, picked from an injectable RNG so a run can be
//! reproduced from its seed.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::selection::{JustificationRequest, Tone};

const PRAISING_PAIR: [&str; 5] = [
    "Excellent {p1} and strong {p2} made a solid impact.",
    "Great {p1} and good {p2} helped you stand out.",
    "{p1} and {p2} were key strengths in this cycle.",
    "Your {p1} and {p2} stood above your peers.",
    "Consistently high {p1} and reliable {p2} performance paid off.",
];

const MOTIVATING_PAIR: [&str; 5] = [
    "Low {p1} and weak {p2} impacted your score.",
    "Underperformance in {p1} and {p2} led to a lower allocation.",
    "{p1} and {p2} were below expectations this cycle.",
    "Improving {p1} and {p2} can significantly boost your results.",
    "Your {p1} and {p2} scores were relatively low compared to peers.",
];

const PRAISING_SINGLE: [&str; 5] = [
    "Excellent {p1} made a solid impact.",
    "Great {p1} helped you stand out.",
    "{p1} was a key strength in this cycle.",
    "Your {p1} stood above your peers.",
    "Consistently high {p1} paid off.",
];

const MOTIVATING_SINGLE: [&str; 5] = [
    "Low {p1} impacted your score.",
    "Underperformance in {p1} led to a lower allocation.",
    "{p1} was below expectations this cycle.",
    "Improving {p1} can significantly boost your results.",
    "Your {p1} score was relatively low compared to peers.",
];

/// Used when a request carries no parameter at all
const NEUTRAL: &str = "Allocation based on the team's shared base amount.";

/// Renders template justifications
pub struct TemplateJustifier {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl TemplateJustifier {
    /// Use any RNG, e.g. a mock in tests
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Reproducible template choice
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Render a sentence for the request
    pub fn render(&self, request: &JustificationRequest) -> String {
        let templates = match (request.tone, request.picks.len()) {
            (_, 0) => return NEUTRAL.to_string(),
            (Tone::Praising, 1) => &PRAISING_SINGLE,
            (Tone::Motivating, 1) => &MOTIVATING_SINGLE,
            (Tone::Praising, _) => &PRAISING_PAIR,
            (Tone::Motivating, _) => &MOTIVATING_PAIR,
        };

        let index = self.rng.lock().gen_range(0..templates.len());
        let mut sentence = templates[index].replace("{p1}", request.picks[0].label());
        if let Some(second) = request.picks.get(1) {
            sentence = sentence.replace("{p2}", second.label());
        }
        capitalize(&sentence)
    }
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

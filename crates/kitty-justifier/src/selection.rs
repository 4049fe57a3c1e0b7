//! Picks the parameters a justification talks about
//!
//! Parameters are ranked by `raw × weight`. Agents whose allocation share
//! reaches the threshold are praised for their two strongest parameters;
//! the others are coached on their two weakest.

use kitty_allocator::WeightConfig;
use kitty_common::{AgentId, Parameter, SalesAgent};
use serde::Serialize;

/// Number of parameters named in a justification
pub const PICKS_PER_JUSTIFICATION: usize = 2;

/// Tone of a justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Share at or above the threshold
    Praising,
    /// Share below the threshold
    Motivating,
}

/// One ranked parameter of an agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterScore {
    pub parameter: Parameter,
    pub raw_value: f64,
    pub weighted_score: f64,
}

impl ParameterScore {
    pub fn label(&self) -> &'static str {
        self.parameter.label()
    }
}

/// Everything a generator needs to write one agent's justification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JustificationRequest {
    pub agent: AgentId,
    pub tone: Tone,
    /// One or two parameters, strongest first for praise; for coaching the
    /// second-weakest then the weakest
    pub picks: Vec<ParameterScore>,
}

/// Rank the configured parameters of an agent, best first
///
/// Equal weighted scores keep the weight declaration order.
pub fn rank_parameters(agent: &SalesAgent, weights: &WeightConfig) -> Vec<ParameterScore> {
    let mut scored: Vec<(usize, ParameterScore)> = weights
        .iter()
        .enumerate()
        .map(|(index, (parameter, weight))| {
            let raw_value = agent.value(parameter).unwrap_or(0.0);
            (
                index,
                ParameterScore {
                    parameter,
                    raw_value,
                    weighted_score: raw_value * weight,
                },
            )
        })
        .collect();

    scored.sort_by(|(ia, a), (ib, b)| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then_with(|| ia.cmp(ib))
    });

    scored.into_iter().map(|(_, score)| score).collect()
}

/// Build the request for one agent
pub fn select(
    agent: &SalesAgent,
    weights: &WeightConfig,
    allocation: f64,
    kitty: f64,
    threshold: f64,
) -> JustificationRequest {
    let ranked = rank_parameters(agent, weights);
    let tone = if allocation / kitty >= threshold {
        Tone::Praising
    } else {
        Tone::Motivating
    };

    let take = PICKS_PER_JUSTIFICATION.min(ranked.len());
    let picks = match tone {
        Tone::Praising => ranked[..take].to_vec(),
        Tone::Motivating => ranked[ranked.len() - take..].to_vec(),
    };

    JustificationRequest {
        agent: agent.id.clone(),
        tone,
        picks,
    }
}

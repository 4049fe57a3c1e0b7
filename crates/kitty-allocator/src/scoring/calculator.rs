//! Raw allocation: flat base share plus weighted bonus contributions

use kitty_common::{AgentId, Parameter, SalesAgent, ValidationError};
use tracing::{debug, instrument};

use super::rounding::round_amount;
use crate::{AllocationPolicy, WeightConfig};

/// Allocation of one agent before capping
#[derive(Debug, Clone, PartialEq)]
pub struct RawAllocation {
    pub id: AgentId,
    /// Flat share, identical for every agent
    pub base: f64,
    /// Sum of weighted bonus contributions
    pub bonus: f64,
    /// `round4(base + bonus)`
    pub amount: f64,
}

/// Per-parameter share of the bonus pool
pub struct ContributionScorer {
    bonus_pool: f64,
    /// (parameter, weight, sum of raw values across agents)
    totals: Vec<(Parameter, f64, f64)>,
}

impl ContributionScorer {
    /// Sum every configured parameter across the team
    pub fn new(weights: &WeightConfig, agents: &[SalesAgent], bonus_pool: f64) -> Self {
        let totals = weights
            .iter()
            .map(|(param, weight)| {
                let total = agents.iter().filter_map(|a| a.value(param)).sum();
                (param, weight, total)
            })
            .collect();

        Self { bonus_pool, totals }
    }

    /// Team total of a parameter; zero when not configured
    pub fn total(&self, parameter: Parameter) -> f64 {
        self.totals
            .iter()
            .find(|(p, _, _)| *p == parameter)
            .map(|(_, _, total)| *total)
            .unwrap_or(0.0)
    }

    /// `(v / total) × w × pool`; zero when the team total is zero
    pub fn contribution(&self, agent: &SalesAgent, parameter: Parameter) -> f64 {
        let Some((_, weight, total)) = self.totals.iter().find(|(p, _, _)| *p == parameter) else {
            return 0.0;
        };
        if *total == 0.0 {
            return 0.0;
        }
        let value = agent.value(parameter).unwrap_or(0.0);
        (value / total) * weight * self.bonus_pool
    }

    /// Sum of the agent's contributions over all configured parameters
    pub fn bonus(&self, agent: &SalesAgent) -> f64 {
        self.totals
            .iter()
            .map(|(param, _, _)| self.contribution(agent, *param))
            .sum()
    }
}

/// Combines base shares and bonuses into raw allocations
pub struct AllocationCalculator<'a> {
    weights: &'a WeightConfig,
    policy: &'a AllocationPolicy,
}

impl<'a> AllocationCalculator<'a> {
    pub fn new(weights: &'a WeightConfig, policy: &'a AllocationPolicy) -> Self {
        Self { weights, policy }
    }

    /// Compute the raw allocation of every agent, in input order
    #[instrument(skip(self, agents), fields(agents = agents.len()))]
    pub fn allocate(
        &self,
        kitty: f64,
        agents: &[SalesAgent],
    ) -> Result<Vec<RawAllocation>, ValidationError> {
        self.validate(kitty, agents)?;

        let base_amount = kitty * self.policy.base_percent;
        let bonus_pool = kitty - base_amount;
        let per_agent_base = base_amount / agents.len() as f64;
        let scorer = ContributionScorer::new(self.weights, agents, bonus_pool);

        let allocations = agents
            .iter()
            .map(|agent| {
                let bonus = scorer.bonus(agent);
                let amount = round_amount(per_agent_base + bonus);
                debug!(agent = %agent.id, base = per_agent_base, bonus, amount, "Raw allocation");
                RawAllocation {
                    id: agent.id.clone(),
                    base: per_agent_base,
                    bonus,
                    amount,
                }
            })
            .collect();

        Ok(allocations)
    }

    /// Reject inputs that would divide by zero or poison the sums
    fn validate(&self, kitty: f64, agents: &[SalesAgent]) -> Result<(), ValidationError> {
        if !kitty.is_finite() || kitty <= 0.0 {
            return Err(ValidationError::InvalidKitty(kitty));
        }
        if agents.is_empty() {
            return Err(ValidationError::NoAgents);
        }

        for agent in agents {
            for (param, _) in self.weights.iter() {
                let value = agent.value(param).ok_or_else(|| ValidationError::MissingValue {
                    agent: agent.id.to_string(),
                    parameter: param.to_string(),
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        agent: agent.id.to_string(),
                        parameter: param.to_string(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

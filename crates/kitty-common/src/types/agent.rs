//! Sales agents as received in an input case

use serde::{Deserialize, Serialize};
use std::fmt;

use super::parameter::Parameter;

/// Opaque agent identifier, echoed verbatim in the output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Number(n) => write!(f, "{}", n),
            AgentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId::Text(s.to_string())
    }
}

impl From<u64> for AgentId {
    fn from(n: u64) -> Self {
        AgentId::Number(n.into())
    }
}

/// A sales agent and its raw performance values
///
/// Values are optional at the serde level so that a case missing a
/// configured parameter is reported as a validation error naming the agent,
/// instead of failing the whole input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAgent {
    pub id: AgentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_achieved_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_clients: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority_months: Option<f64>,
}

impl SalesAgent {
    /// Create an agent with no values set
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            performance_score: None,
            target_achieved_percent: None,
            active_clients: None,
            seniority_months: None,
        }
    }

    /// Builder: set the raw value of a parameter
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        *self.slot(parameter) = Some(value);
        self
    }

    /// Raw value of a parameter, if present
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::PerformanceScore => self.performance_score,
            Parameter::TargetAchievedPercent => self.target_achieved_percent,
            Parameter::ActiveClients => self.active_clients,
            Parameter::SeniorityMonths => self.seniority_months,
        }
    }

    fn slot(&mut self, parameter: Parameter) -> &mut Option<f64> {
        match parameter {
            Parameter::PerformanceScore => &mut self.performance_score,
            Parameter::TargetAchievedPercent => &mut self.target_achieved_percent,
            Parameter::ActiveClients => &mut self.active_clients,
            Parameter::SeniorityMonths => &mut self.seniority_months,
        }
    }
}

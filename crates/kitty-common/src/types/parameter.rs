//! Parameter - the fixed vocabulary of agent performance attributes
//!
//! Weights are configured per parameter, and justifications refer to a
//! parameter by its human-readable label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A performance attribute carried by every sales agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parameter {
    /// Overall performance rating
    PerformanceScore,
    /// Percentage of the sales target reached
    TargetAchievedPercent,
    /// Number of clients actively served
    ActiveClients,
    /// Tenure in months
    SeniorityMonths,
}

impl Parameter {
    /// Every known parameter, in canonical order
    pub const ALL: [Parameter; 4] = [
        Parameter::PerformanceScore,
        Parameter::TargetAchievedPercent,
        Parameter::ActiveClients,
        Parameter::SeniorityMonths,
    ];

    /// Field name as it appears in input files and weight specifications
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::PerformanceScore => "performanceScore",
            Parameter::TargetAchievedPercent => "targetAchievedPercent",
            Parameter::ActiveClients => "activeClients",
            Parameter::SeniorityMonths => "seniorityMonths",
        }
    }

    /// Friendly label used in justification sentences
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::PerformanceScore => "performance",
            Parameter::TargetAchievedPercent => "target achievement",
            Parameter::ActiveClients => "client engagement",
            Parameter::SeniorityMonths => "experience",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

//! Input cases and published allocation artifacts

use serde::{Deserialize, Serialize};

use super::agent::{AgentId, SalesAgent};

/// Marker appended to the justification of an agent clamped to the cap
pub const CAPPED_MARKER: &str = " (capped)";

/// One input case: a kitty to split among a team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub title: String,
    pub site_kitty: f64,
    pub sales_agents: Vec<SalesAgent>,
}

/// Amount assigned to one agent, with its justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub id: AgentId,
    pub assigned_discount: f64,
    pub justification: String,
}

impl AllocationResult {
    pub fn new(id: AgentId, assigned_discount: f64, justification: impl Into<String>) -> Self {
        Self {
            id,
            assigned_discount,
            justification: justification.into(),
        }
    }

    /// Whether the cap engine clamped this allocation
    pub fn is_capped(&self) -> bool {
        self.justification.ends_with(CAPPED_MARKER)
    }
}

/// Output artifact written for each case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub title: String,
    pub allocations: Vec<AllocationResult>,
}

//! Per-case pipeline: allocate → justify → cap

use kitty_allocator::{AllocationCalculator, CapEngine, CapSummary};
use kitty_common::{AllocationResult, Case, CaseReport, Result};
use kitty_justifier::{JustificationGenerator, JustificationSource};
use tracing::{info, instrument, warn};

use crate::config::KittyConfig;

/// Result of one case
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub report: CaseReport,
    pub summary: CapSummary,
    /// Agents whose justification came from the external service
    pub external_justifications: usize,
}

/// Runs the allocation pipeline for individual cases
pub struct Pipeline<'a> {
    config: &'a KittyConfig,
    generator: &'a JustificationGenerator,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a KittyConfig, generator: &'a JustificationGenerator) -> Self {
        Self { config, generator }
    }

    /// Allocate one case; validation errors abort only this case
    #[instrument(skip_all, fields(title = %case.title, kitty = case.site_kitty))]
    pub async fn run_case(&self, case: &Case) -> Result<CaseOutcome> {
        let raw = AllocationCalculator::new(&self.config.weights, &self.config.policy)
            .allocate(case.site_kitty, &case.sales_agents)?;

        let justifications = self
            .generator
            .justify_all(&case.sales_agents, &raw, &self.config.weights, case.site_kitty)
            .await;
        let external_justifications = justifications
            .iter()
            .filter(|j| j.source == JustificationSource::External)
            .count();

        let mut allocations: Vec<AllocationResult> = raw
            .into_iter()
            .zip(justifications)
            .map(|(allocation, justification)| {
                AllocationResult::new(allocation.id, allocation.amount, justification.text)
            })
            .collect();

        let summary = CapEngine::from_policy(&self.config.policy).apply(&mut allocations, case.site_kitty);
        if summary.leftover() > 0.0 {
            warn!(
                leftover = summary.leftover(),
                excess = summary.excess,
                "Capped excess not fully redistributed"
            );
        }

        let total: f64 = allocations.iter().map(|a| a.assigned_discount).sum();
        info!(
            agents = allocations.len(),
            total,
            capped = summary.capped,
            scaled = summary.scaled,
            external_justifications,
            "Case allocated"
        );

        Ok(CaseOutcome {
            report: CaseReport {
                title: case.title.clone(),
                allocations,
            },
            summary,
            external_justifications,
        })
    }
}

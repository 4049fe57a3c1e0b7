//! Cap engine: cap → redistribute → clamp → sanitize
//!
//! The phases run in that order, once, over a case's allocation list.

use kitty_common::{AllocationResult, CAPPED_MARKER};
use tracing::{debug, warn};

use crate::AllocationPolicy;

/// What the engine did to a case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapSummary {
    /// `kitty × cap_percent`
    pub cap_limit: f64,
    /// Total removed from capped agents
    pub excess: f64,
    /// Part of the excess handed to agents under the cap
    pub redistributed: f64,
    /// Agents clamped to the cap
    pub capped: usize,
    /// Whether the final clamp had to scale the list down
    pub scaled: bool,
    /// Non-finite amounts forced to zero
    pub sanitized: usize,
}

impl CapSummary {
    /// Excess that stayed out of the payout
    pub fn leftover(&self) -> f64 {
        (self.excess - self.redistributed).max(0.0)
    }
}

/// Enforces the per-agent cap and the kitty budget
#[derive(Debug, Clone)]
pub struct CapEngine {
    cap_percent: f64,
    allow_leftover: bool,
}

impl CapEngine {
    pub fn new(cap_percent: f64, allow_leftover: bool) -> Self {
        Self {
            cap_percent,
            allow_leftover,
        }
    }

    pub fn from_policy(policy: &AllocationPolicy) -> Self {
        Self::new(policy.cap_percent, policy.allow_leftover)
    }

    /// Maximum amount a single agent may receive from this kitty
    pub fn cap_limit(&self, kitty: f64) -> f64 {
        kitty * self.cap_percent
    }

    /// Run every phase in place
    pub fn apply(&self, allocations: &mut [AllocationResult], kitty: f64) -> CapSummary {
        let cap_limit = self.cap_limit(kitty);
        let (excess, capped) = Self::enforce_cap(allocations, cap_limit);

        let redistributed = if excess > 0.0 && !self.allow_leftover {
            Self::redistribute(allocations, cap_limit, excess)
        } else {
            0.0
        };

        let scaled = Self::clamp_to_kitty(allocations, kitty);
        let sanitized = Self::sanitize(allocations);

        let summary = CapSummary {
            cap_limit,
            excess,
            redistributed,
            capped,
            scaled,
            sanitized,
        };
        debug!(?summary, "Cap engine applied");
        summary
    }

    /// Clamp agents above the cap; returns (excess, capped count)
    fn enforce_cap(allocations: &mut [AllocationResult], cap_limit: f64) -> (f64, usize) {
        let mut excess = 0.0;
        let mut capped = 0;

        for allocation in allocations.iter_mut() {
            if allocation.assigned_discount > cap_limit {
                excess += allocation.assigned_discount - cap_limit;
                allocation.assigned_discount = cap_limit;
                allocation.justification.push_str(CAPPED_MARKER);
                capped += 1;
            }
        }

        (excess, capped)
    }

    /// Single pass: each agent under the cap gets its proportional share of
    /// the excess, bounded by its headroom. What a full agent cannot absorb is
    /// not re-offered.
    fn redistribute(allocations: &mut [AllocationResult], cap_limit: f64, excess: f64) -> f64 {
        let eligible_total: f64 = allocations
            .iter()
            .filter(|a| a.assigned_discount < cap_limit)
            .map(|a| a.assigned_discount)
            .sum();

        if eligible_total <= 0.0 || !eligible_total.is_finite() {
            return 0.0;
        }

        let mut redistributed = 0.0;
        for allocation in allocations
            .iter_mut()
            .filter(|a| a.assigned_discount < cap_limit)
        {
            // Shares come from the whole excess, not from what earlier agents
            // left over, so visiting order does not change anyone's share
            let share = excess * allocation.assigned_discount / eligible_total;
            let headroom = cap_limit - allocation.assigned_discount;
            let extra = share.min(headroom);
            allocation.assigned_discount += extra;
            redistributed += extra;
        }

        redistributed
    }

    /// Scale down and floor when the total exceeds the kitty
    fn clamp_to_kitty(allocations: &mut [AllocationResult], kitty: f64) -> bool {
        let total: f64 = allocations.iter().map(|a| a.assigned_discount).sum();
        // A NaN total means an upstream bug; sanitize handles it
        if total.is_nan() || total <= kitty {
            return false;
        }

        let scale = kitty / total;
        for allocation in allocations.iter_mut() {
            allocation.assigned_discount = (allocation.assigned_discount * scale).floor();
        }
        true
    }

    fn sanitize(allocations: &mut [AllocationResult]) -> usize {
        let mut sanitized = 0;
        for allocation in allocations.iter_mut() {
            if !allocation.assigned_discount.is_finite() {
                warn!(
                    agent = %allocation.id,
                    value = allocation.assigned_discount,
                    "Non-finite allocation forced to zero"
                );
                allocation.assigned_discount = 0.0;
                sanitized += 1;
            }
        }
        sanitized
    }
}

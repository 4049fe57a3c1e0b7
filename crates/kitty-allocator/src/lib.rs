//! # Kitty Allocator
//!
//! Splits a fixed kitty among sales agents.
//!
//! ## Allocation Formula
//!
//! ```text
//! base_i  = K × β / n
//! bonus_i = Σ_p  (v_ip / Σ_j v_jp) × w_p × K × (1 - β)
//! a_i     = round4(base_i + bonus_i)
//! ```
//!
//! Where:
//! - K: the kitty
//! - β: base percent, distributed flat
//! - w_p: weight of parameter p
//! - v_ip: raw value of parameter p for agent i
//!
//! A parameter whose values sum to zero contributes nothing.
//!
//! ## Cap Policy
//!
//! No agent may receive more than `K × cap_percent`. The excess is handed
//! back proportionally to agents still under the cap (unless leftover is
//! allowed), and the total is finally clamped to the kitty.

pub mod cap;
pub mod scoring;
pub mod weights;

pub use cap::{CapEngine, CapSummary};
pub use scoring::{round_amount, AllocationCalculator, ContributionScorer, RawAllocation};
pub use weights::WeightConfig;

use kitty_common::ConfigError;

/// Run-wide allocation policy
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPolicy {
    /// Fraction of the kitty distributed flat
    pub base_percent: f64,
    /// Maximum fraction of the kitty a single agent may receive
    pub cap_percent: f64,
    /// Keep capped excess out of the payout instead of redistributing it
    pub allow_leftover: bool,
}

impl AllocationPolicy {
    /// Create a validated policy
    pub fn new(base_percent: f64, cap_percent: f64, allow_leftover: bool) -> Result<Self, ConfigError> {
        let policy = Self {
            base_percent,
            cap_percent,
            allow_leftover,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check both percents are within [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percent("base percent", self.base_percent)?;
        check_percent("cap percent", self.cap_percent)
    }
}

fn check_percent(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::PercentOutOfRange {
            name: name.to_string(),
            value,
        })
    }
}

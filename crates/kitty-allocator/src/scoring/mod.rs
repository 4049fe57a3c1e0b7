//! Contribution scoring and raw allocation
pub mod calculator;
pub mod rounding;

pub use self::calculator::{AllocationCalculator, ContributionScorer, RawAllocation};
pub use self::rounding::round_amount;

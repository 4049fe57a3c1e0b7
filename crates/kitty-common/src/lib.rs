//! # Kitty Common
//!
//! Shared types and errors for the discount kitty allocator.
//!
//! ## Core Types
//!
//! - [`Parameter`]: the performance attributes weights are configured on
//! - [`SalesAgent`]: an agent and its raw values, as read from a case
//! - [`Case`]: one kitty and the team it is split among
//! - [`AllocationResult`]/[`CaseReport`]: published per-case output

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, KittyError, Result, ValidationError};
pub use types::{
    agent::{AgentId, SalesAgent},
    allocation::{AllocationResult, Case, CaseReport, CAPPED_MARKER},
    parameter::Parameter,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal places kept on raw allocations
pub const ALLOCATION_DECIMALS: u32 = 4;

/// Default share of the kitty above which an agent gets a positive justification
pub const DEFAULT_JUSTIFICATION_THRESHOLD: f64 = 0.3;

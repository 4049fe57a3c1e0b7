//! Cap enforcement, excess redistribution and the final budget clamp
pub mod engine;

pub use self::engine::{CapEngine, CapSummary};

//! # Kitty Runner
//!
//! Drives the allocator over a batch of cases.
//!
//! ## Pipeline
//!
//! ```text
//! input.json ──► Case ──► AllocationCalculator ──► JustificationGenerator
//!                                                        │
//!        case-<n>-<slug>.json ◄── CapEngine ◄────────────┘
//! ```
//!
//! Configuration is loaded once ([`config::KittyConfig`]) and passed down
//! explicitly. A failing case is reported and skipped; configuration errors
//! stop the run before any case is processed.

pub mod batch;
pub mod config;
pub mod pipeline;

pub use batch::{case_file_name, load_batch, write_report, BatchReport, BatchRunner, CaseFailure};
pub use config::{JustificationMode, JustificationSettings, KittyConfig};
pub use pipeline::{CaseOutcome, Pipeline};

/// Default input file
pub const DEFAULT_INPUT: &str = "data/sample-input.json";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

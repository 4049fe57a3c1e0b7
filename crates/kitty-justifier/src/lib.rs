//! # Kitty Justifier
//!
//! Short natural-language justifications attached to each allocation.
//!
//! ## Selection
//!
//! Parameters are ranked by `raw × weight`. An agent whose share of the kitty
//! reaches the threshold is praised for the top two; otherwise the bottom two
//! are named in a motivating sentence.
//!
//! ## Strategies
//!
//! - **Templates**: five sentences per tone, chosen by a seedable RNG
//! - **External**: a [`JustificationService`] such as [`GeminiClient`],
//!   falling back to templates per agent on any failure
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            JustificationGenerator            │
//! │  select() ──► JustificationService (timeout) │
//! │                    │ on error                │
//! │                    ▼                         │
//! │              TemplateJustifier               │
//! └──────────────────────────────────────────────┘
//! ```

pub mod generator;
pub mod infra;
pub mod selection;
pub mod service;
pub mod templates;

pub use generator::{GeneratorSettings, Justification, JustificationGenerator, JustificationSource};
pub use infra::gemini::{GeminiClient, GeminiSettings};
pub use selection::{rank_parameters, select, JustificationRequest, ParameterScore, Tone};
pub use service::{GenerationError, JustificationService};
pub use templates::TemplateJustifier;

/// Default per-call timeout of the external service
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of external calls in flight
pub const DEFAULT_CONCURRENCY: usize = 4;

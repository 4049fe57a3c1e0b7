//! Error types for the kitty allocator
//!
//! Provides a unified error type and the configuration / input validation
//! variants that make a run or a single case fail.

use thiserror::Error;

/// Result type alias using KittyError
pub type Result<T> = std::result::Result<T, KittyError>;

/// Unified error type for allocation runs
#[derive(Debug, Error)]
pub enum KittyError {
    // Run-level configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Case-level input errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // File system errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration errors, fatal for the whole run
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Weight specification is empty")]
    EmptyWeights,

    #[error("Malformed weight segment: {0:?}")]
    MalformedWeight(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter configured twice: {0}")]
    DuplicateParameter(String),

    #[error("Weight for {parameter} must be a finite number in [0, 1], got {raw:?}")]
    InvalidWeight { parameter: String, raw: String },

    #[error("{name} must be within [0, 1], got {value}")]
    PercentOutOfRange { name: String, value: f64 },
}

/// Input validation errors, fatal for a single case
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Case has no sales agents")]
    NoAgents,

    #[error("Kitty must be a positive finite amount, got {0}")]
    InvalidKitty(f64),

    #[error("Agent {agent} has no value for {parameter}")]
    MissingValue { agent: String, parameter: String },

    #[error("Agent {agent} has invalid value {value} for {parameter}")]
    InvalidValue {
        agent: String,
        parameter: String,
        value: f64,
    },
}

impl From<serde_json::Error> for KittyError {
    fn from(err: serde_json::Error) -> Self {
        KittyError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for KittyError {
    fn from(err: std::io::Error) -> Self {
        KittyError::Storage(err.to_string())
    }
}

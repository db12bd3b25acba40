//! # World Error Types
//!
//! Errors only exist at the configuration boundary. Runtime operations
//! never fail: placement misses are `None`, bad numbers are clamped.

use thiserror::Error;

/// Errors that can occur while loading world configuration.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Config text was not valid TOML or did not match the schema.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be rendered back to TOML.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Stage name not recognised.
    #[error("unknown stage type: {0:?}")]
    UnknownStage(String),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

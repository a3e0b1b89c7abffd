//! Error types for the Nextcloud operator
//!
//! Only the host boundary (reading inputs, persisting state, publishing the
//! pod spec) produces errors. Reconciliation outcomes are reported through
//! unit status instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Stored state error: {0}")]
    StateError(String),

    #[error("Failed to publish pod spec: {0}")]
    PublishError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

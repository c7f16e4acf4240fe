//! Error types and handling
//!
//! This module contains the error type shared by the simulator, the event
//! store and the aggregator.

use thiserror::Error;

use crate::types::{ConfigError, ConfigValidationError};

/// Errors that can occur while generating or aggregating fulfillment data
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A caller supplied argument is out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The event store could not be opened or created
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// SQLite error while reading or writing the event store
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored row could not be decoded
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigError> for SimulationError {
    fn from(error: ConfigError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a storage unavailable error
    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create a corrupt record error
    pub fn corrupt_record(msg: impl Into<String>) -> Self {
        Self::CorruptRecord(msg.into())
    }

    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::InvalidArgument(_) => "Invalid Argument",
            SimulationError::StorageUnavailable(_) => "Storage Unavailable",
            SimulationError::Storage(_) => "Storage",
            SimulationError::CorruptRecord(_) => "Corrupt Record",
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

//! Configuration error types.
//!
//! A run cannot start without a config file — there is no other signal
//! the project wants tags — so discovery distinguishes "no file found
//! anywhere" from a file that exists but fails to deserialize. Every
//! other module carries its own error enum next to its types.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

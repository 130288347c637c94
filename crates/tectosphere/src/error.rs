//! Error types for configuration loading.
//!
//! Simulation invariants are not represented here: a disconnected mesh or an
//! inconsistent plate boundary is a programmer error and panics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the expected layout.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is outside of its accepted range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

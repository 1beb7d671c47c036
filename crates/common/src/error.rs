//! Shared error types used across s3-doctor crates.

use thiserror::Error;

/// Configuration errors. These are fatal and reported before any network call.
#[derive(Debug, Error, Clone)]
pub enum ConfigError {
    /// One or more required environment variables are not set.
    #[error("Missing environment variables: {}", names.join(", "))]
    MissingVariables {
        /// Names of every missing variable, in declaration order.
        names: Vec<String>,
    },
}

impl ConfigError {
    /// The names of the missing variables, if any.
    pub fn missing_names(&self) -> &[String] {
        match self {
            ConfigError::MissingVariables { names } => names,
        }
    }
}

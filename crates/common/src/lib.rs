//! Shared types and utilities for s3-doctor.
//!
//! This crate provides common functionality used across all s3-doctor crates:
//! - Environment-based configuration with missing-variable reporting
//! - Console step reporter for structured diagnostic output
//! - Shared constants and error types

pub mod config;
pub mod constants;
pub mod error;
pub mod report;

// Re-export commonly used items at crate root
pub use config::{EnvConfig, OPTIONAL_CA_BUNDLE_VAR, REQUIRED_VARS};
pub use constants::*;
pub use error::ConfigError;
pub use report::{StepReporter, StepStatus};

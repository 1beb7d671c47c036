//! Environment-based configuration.
//!
//! The diagnostic tool is configured entirely through environment variables.
//! Reads go through an injectable lookup function so tests can exercise the
//! missing-variable listing without mutating the process environment.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Required environment variables, in the order they are reported.
pub const REQUIRED_VARS: [&str; 5] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_DEFAULT_REGION",
    "AWS_S3_ENDPOINT",
    "AWS_S3_BUCKET",
];

/// Optional environment variable naming a PEM CA bundle path.
pub const OPTIONAL_CA_BUNDLE_VAR: &str = "AWS_CA_BUNDLE";

/// Resolved configuration for a diagnostic run.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// AWS access key id.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: String,
    /// AWS region name.
    pub region: String,
    /// Object store endpoint URL (e.g. "https://storage.example:9000").
    pub endpoint: String,
    /// Bucket every diagnostic operation targets.
    pub bucket: String,
    /// Optional CA bundle path from `AWS_CA_BUNDLE`.
    pub ca_bundle: Option<PathBuf>,
}

impl EnvConfig {
    /// Read configuration from the process environment.
    ///
    /// # Returns
    /// The resolved configuration, or `ConfigError::MissingVariables` listing
    /// every required variable that is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a caller-supplied lookup.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value for a variable name, or None if unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|name| lookup(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables { names: missing });
        }

        // All present after the check above.
        let mut get = |name: &str| lookup(name).unwrap_or_default();

        Ok(Self {
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            region: get("AWS_DEFAULT_REGION"),
            endpoint: get("AWS_S3_ENDPOINT"),
            bucket: get("AWS_S3_BUCKET"),
            ca_bundle: lookup(OPTIONAL_CA_BUNDLE_VAR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("AWS_DEFAULT_REGION", "us-east-1"),
            ("AWS_S3_ENDPOINT", "https://storage.example:9000"),
            ("AWS_S3_BUCKET", "diagnostics"),
        ])
    }

    #[test]
    fn test_all_required_present() {
        let env = full_env();
        let config = EnvConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bucket, "diagnostics");
        assert_eq!(config.endpoint, "https://storage.example:9000");
        assert!(config.ca_bundle.is_none());
    }

    #[test]
    fn test_single_missing_variable_listed() {
        let mut env = full_env();
        env.remove("AWS_S3_BUCKET");
        let err = EnvConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err.missing_names(), ["AWS_S3_BUCKET"]);
    }

    #[test]
    fn test_multiple_missing_reported_in_order() {
        let mut env = full_env();
        env.remove("AWS_ACCESS_KEY_ID");
        env.remove("AWS_S3_ENDPOINT");
        let err = EnvConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err.missing_names(), ["AWS_ACCESS_KEY_ID", "AWS_S3_ENDPOINT"]);
        assert_eq!(
            err.to_string(),
            "Missing environment variables: AWS_ACCESS_KEY_ID, AWS_S3_ENDPOINT"
        );
    }

    #[test]
    fn test_optional_bundle_picked_up() {
        let mut env = full_env();
        env.insert("AWS_CA_BUNDLE", "/etc/pki/custom.pem");
        let config = EnvConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(config.ca_bundle, Some(PathBuf::from("/etc/pki/custom.pem")));
    }
}

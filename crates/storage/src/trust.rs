//! Trust-mode resolution.
//!
//! A trust mode plus an optional CA bundle path deterministically yields a
//! connection plan: the transport scheme, the certificate verify spec, and a
//! human-readable description of the connection. The verify spec is never
//! chosen independently of the trust mode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the server's certificate is trusted for a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustMode {
    /// HTTPS with the system trust store.
    DefaultTls,
    /// HTTPS with a custom CA bundle when one is available.
    CustomBundleTls,
    /// Plain HTTP, no certificate verification.
    PlaintextNoTls,
}

impl TrustMode {
    /// All trust modes in fallback order.
    pub const FALLBACK_ORDER: [TrustMode; 3] = [
        TrustMode::DefaultTls,
        TrustMode::CustomBundleTls,
        TrustMode::PlaintextNoTls,
    ];

    /// Scenario name used in object keys and console output.
    pub fn scenario_name(&self) -> &'static str {
        match self {
            TrustMode::DefaultTls => "tls_default",
            TrustMode::CustomBundleTls => "tls_custom_bundle",
            TrustMode::PlaintextNoTls => "http_connection",
        }
    }
}

/// Certificate verification policy derived from a trust mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifySpec {
    /// Validate against the system trust store.
    SystemTrust,
    /// Validate against a PEM bundle at the given path.
    Bundle(PathBuf),
    /// No verification; only valid for plaintext transport.
    Disabled,
}

/// A fully resolved connection attempt: endpoint with the scheme forced by
/// the trust mode, and the derived verify spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPlan {
    /// The trust mode this plan was resolved for.
    pub trust_mode: TrustMode,
    /// Endpoint URL with the scheme the trust mode forces.
    pub endpoint: String,
    /// Derived certificate verification policy.
    pub verify: VerifySpec,
}

impl ConnectionPlan {
    /// Resolve a trust mode against an endpoint and an optional bundle path.
    ///
    /// # Arguments
    /// * `endpoint` - Object store endpoint URL
    /// * `trust_mode` - Requested trust mode
    /// * `bundle` - CA bundle path, used only by `CustomBundleTls`
    pub fn resolve(endpoint: &str, trust_mode: TrustMode, bundle: Option<&Path>) -> Self {
        let (endpoint, verify) = match trust_mode {
            TrustMode::DefaultTls => (endpoint.to_string(), VerifySpec::SystemTrust),
            TrustMode::CustomBundleTls => {
                let verify = match bundle {
                    Some(path) => VerifySpec::Bundle(path.to_path_buf()),
                    None => VerifySpec::SystemTrust,
                };
                (endpoint.to_string(), verify)
            }
            TrustMode::PlaintextNoTls => {
                (rewrite_to_http(endpoint), VerifySpec::Disabled)
            }
        };

        Self {
            trust_mode,
            endpoint,
            verify,
        }
    }

    /// Human-readable description of the connection, emitted when a client
    /// is constructed from this plan.
    pub fn description(&self) -> &'static str {
        match (&self.trust_mode, &self.verify) {
            (TrustMode::DefaultTls, _) => "HTTPS with default SSL",
            (TrustMode::CustomBundleTls, VerifySpec::Bundle(_)) => "HTTPS with custom CA bundle",
            (TrustMode::CustomBundleTls, _) => "HTTPS with default SSL (no custom bundle found)",
            (TrustMode::PlaintextNoTls, _) => "HTTP with no SSL/TLS",
        }
    }
}

/// Rewrite an `https://` prefix to `http://`, leaving other endpoints alone.
fn rewrite_to_http(endpoint: &str) -> String {
    match endpoint.strip_prefix("https://") {
        Some(rest) => format!("http://{rest}"),
        None => endpoint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://storage.example:9000";

    #[test]
    fn test_default_tls_uses_system_trust() {
        let plan = ConnectionPlan::resolve(ENDPOINT, TrustMode::DefaultTls, None);
        assert_eq!(plan.endpoint, ENDPOINT);
        assert_eq!(plan.verify, VerifySpec::SystemTrust);
        assert_eq!(plan.description(), "HTTPS with default SSL");
    }

    #[test]
    fn test_default_tls_ignores_bundle() {
        let plan = ConnectionPlan::resolve(
            ENDPOINT,
            TrustMode::DefaultTls,
            Some(Path::new("/tmp/bundle.pem")),
        );
        assert_eq!(plan.verify, VerifySpec::SystemTrust);
    }

    #[test]
    fn test_custom_bundle_with_path() {
        let plan = ConnectionPlan::resolve(
            ENDPOINT,
            TrustMode::CustomBundleTls,
            Some(Path::new("storage.crt")),
        );
        assert_eq!(plan.endpoint, ENDPOINT);
        assert_eq!(plan.verify, VerifySpec::Bundle(PathBuf::from("storage.crt")));
        assert_eq!(plan.description(), "HTTPS with custom CA bundle");
    }

    #[test]
    fn test_custom_bundle_without_path_falls_back_to_system_trust() {
        let plan = ConnectionPlan::resolve(ENDPOINT, TrustMode::CustomBundleTls, None);
        assert_eq!(plan.verify, VerifySpec::SystemTrust);
        assert_eq!(
            plan.description(),
            "HTTPS with default SSL (no custom bundle found)"
        );
    }

    #[test]
    fn test_plaintext_rewrites_https_to_http() {
        let plan = ConnectionPlan::resolve(ENDPOINT, TrustMode::PlaintextNoTls, None);
        assert_eq!(plan.endpoint, "http://storage.example:9000");
        assert_eq!(plan.verify, VerifySpec::Disabled);
        assert_eq!(plan.description(), "HTTP with no SSL/TLS");
    }

    #[test]
    fn test_plaintext_leaves_http_endpoint_alone() {
        let plan =
            ConnectionPlan::resolve("http://storage.example:9000", TrustMode::PlaintextNoTls, None);
        assert_eq!(plan.endpoint, "http://storage.example:9000");
    }

    #[test]
    fn test_plaintext_ignores_bundle() {
        let plan = ConnectionPlan::resolve(
            ENDPOINT,
            TrustMode::PlaintextNoTls,
            Some(Path::new("storage.crt")),
        );
        assert_eq!(plan.verify, VerifySpec::Disabled);
    }

    #[test]
    fn test_fallback_order_is_fixed() {
        assert_eq!(
            TrustMode::FALLBACK_ORDER,
            [
                TrustMode::DefaultTls,
                TrustMode::CustomBundleTls,
                TrustMode::PlaintextNoTls
            ]
        );
    }

    #[test]
    fn test_scenario_names() {
        assert_eq!(TrustMode::DefaultTls.scenario_name(), "tls_default");
        assert_eq!(TrustMode::CustomBundleTls.scenario_name(), "tls_custom_bundle");
        assert_eq!(TrustMode::PlaintextNoTls.scenario_name(), "http_connection");
    }
}

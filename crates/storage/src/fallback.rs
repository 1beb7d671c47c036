//! Connection fallback procedure.
//!
//! Connecting tries at most three trust modes in a fixed order:
//!
//! 1. `DefaultTls` - HTTPS against the system trust store
//! 2. `CustomBundleTls` - HTTPS against a bundle freshly extracted from the
//!    certificate chain the server itself presents
//! 3. `PlaintextNoTls` - plain HTTP
//!
//! Only a TLS validation failure moves the procedure to the next mode; any
//! other failure is fatal and propagates immediately. The extracted bundle is
//! written to a well-known file and its path is threaded explicitly into the
//! retry plan - there is no process-wide mutable state.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use s3_doctor_common::{StepReporter, StepStatus, EXTRACTED_BUNDLE_FILE};

use crate::error::ConnectError;
use crate::trust::{ConnectionPlan, TrustMode};

/// Backend seam: build a client for a plan and probe the connection.
#[async_trait]
pub trait Connect: Send + Sync {
    /// The client handle produced on success.
    type Client: Send;

    /// Attempt one connection under the given plan.
    ///
    /// Implementations must classify certificate validation problems as
    /// `ConnectError::TlsValidation`; everything else is treated as fatal.
    async fn connect(&self, plan: &ConnectionPlan) -> Result<Self::Client, ConnectError>;
}

/// Capability seam: fetch the PEM certificate chain a server presents.
///
/// Implemented with a native TLS handshake, not a subprocess.
#[async_trait]
pub trait FetchCertificateChain: Send + Sync {
    /// Fetch the chain presented by the endpoint's server, PEM-encoded.
    async fn fetch_chain_pem(&self, endpoint: &str) -> Result<Vec<u8>, ConnectError>;
}

/// Tagged result of a single connection attempt.
#[derive(Debug)]
pub enum AttemptOutcome<C> {
    /// The attempt produced a working client.
    Success(C),
    /// Certificate validation failed; the next trust mode may be tried.
    RetryableTlsFailure(ConnectError),
    /// Any other failure; the procedure aborts.
    FatalFailure(ConnectError),
}

impl<C> AttemptOutcome<C> {
    fn classify(result: Result<C, ConnectError>) -> Self {
        match result {
            Ok(client) => AttemptOutcome::Success(client),
            Err(err) if err.is_tls_failure() => AttemptOutcome::RetryableTlsFailure(err),
            Err(err) => AttemptOutcome::FatalFailure(err),
        }
    }
}

/// Options for the fallback procedure.
#[derive(Debug, Clone)]
pub struct FallbackOptions {
    /// Step label used on every reported line.
    pub step_label: String,
    /// File the extracted certificate chain is written to.
    pub bundle_path: PathBuf,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            step_label: "Step 1".to_string(),
            bundle_path: PathBuf::from(EXTRACTED_BUNDLE_FILE),
        }
    }
}

/// A successfully established connection.
#[derive(Debug)]
pub struct Established<C> {
    /// The working client handle.
    pub client: C,
    /// The plan the successful attempt used.
    pub plan: ConnectionPlan,
    /// Path of the extracted bundle, when stage two ran.
    pub extracted_bundle: Option<PathBuf>,
}

impl<C> Established<C> {
    /// Whether the connection ended up on plain HTTP.
    pub fn used_plaintext(&self) -> bool {
        self.plan.trust_mode == TrustMode::PlaintextNoTls
    }

    /// Whether a certificate chain was extracted along the way.
    pub fn used_extracted_bundle(&self) -> bool {
        self.extracted_bundle.is_some()
    }
}

/// Run the fallback procedure against an endpoint.
///
/// # Arguments
/// * `endpoint` - Object store endpoint URL (https scheme expected)
/// * `connector` - Backend that builds and probes clients
/// * `fetcher` - Capability to fetch the server's certificate chain
/// * `options` - Step label and extracted-bundle location
/// * `reporter` - Console reporter for per-attempt outcomes
///
/// # Returns
/// The established connection, or the first fatal error. A TLS failure on
/// the final (plaintext) attempt is also fatal - there is nothing left to
/// fall back to.
pub async fn establish_with_fallback<C, F, W>(
    endpoint: &str,
    connector: &C,
    fetcher: &F,
    options: &FallbackOptions,
    reporter: &mut StepReporter<W>,
) -> Result<Established<C::Client>, ConnectError>
where
    C: Connect,
    F: FetchCertificateChain,
    W: Write + Send,
{
    let step = options.step_label.as_str();
    reporter.step(step, StepStatus::Info, "Connecting to the S3 bucket with SSL...");

    // Attempt 1: HTTPS, system trust store.
    let plan = ConnectionPlan::resolve(endpoint, TrustMode::DefaultTls, None);
    match AttemptOutcome::classify(connector.connect(&plan).await) {
        AttemptOutcome::Success(client) => {
            reporter.step(step, StepStatus::Success, "Successfully verified SSL connection.");
            return Ok(Established {
                client,
                plan,
                extracted_bundle: None,
            });
        }
        AttemptOutcome::RetryableTlsFailure(err) => {
            log::debug!("default-trust attempt failed: {err}");
            reporter.step(step, StepStatus::Error, "SSL connection using default CA failed.");
        }
        AttemptOutcome::FatalFailure(err) => {
            reporter.step(step, StepStatus::Error, format!("Connection failed: {err}"));
            return Err(err);
        }
    }

    // Attempt 2: HTTPS, bundle extracted from the server's own chain.
    reporter.step(
        step,
        StepStatus::Info,
        format!("Generating {} from the server certificate chain...", options.bundle_path.display()),
    );
    let pem = fetcher.fetch_chain_pem(endpoint).await?;
    write_bundle(&options.bundle_path, &pem).await?;

    let plan = ConnectionPlan::resolve(endpoint, TrustMode::CustomBundleTls, Some(&options.bundle_path));
    match AttemptOutcome::classify(connector.connect(&plan).await) {
        AttemptOutcome::Success(client) => {
            reporter.step(
                step,
                StepStatus::Success,
                format!("Connected using custom CA bundle ({}).", options.bundle_path.display()),
            );
            return Ok(Established {
                client,
                plan,
                extracted_bundle: Some(options.bundle_path.clone()),
            });
        }
        AttemptOutcome::RetryableTlsFailure(err) => {
            log::debug!("extracted-bundle attempt failed: {err}");
            reporter.step(step, StepStatus::Info, "Retrying connection without SSL verification...");
        }
        AttemptOutcome::FatalFailure(err) => {
            reporter.step(step, StepStatus::Error, format!("Connection failed: {err}"));
            return Err(err);
        }
    }

    // Attempt 3: plain HTTP. Last resort, any failure is final.
    let plan = ConnectionPlan::resolve(endpoint, TrustMode::PlaintextNoTls, None);
    match connector.connect(&plan).await {
        Ok(client) => {
            reporter.step(step, StepStatus::Success, "Connected to the S3 bucket without SSL.");
            Ok(Established {
                client,
                plan,
                extracted_bundle: Some(options.bundle_path.clone()),
            })
        }
        Err(err) => {
            reporter.step(step, StepStatus::Error, format!("Connection failed: {err}"));
            Err(err)
        }
    }
}

async fn write_bundle(path: &Path, pem: &[u8]) -> Result<(), ConnectError> {
    tokio::fs::write(path, pem)
        .await
        .map_err(|e| ConnectError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

//! AWS SDK backend for s3-doctor.
//!
//! Implements the backend seams of `s3-doctor-storage` with the AWS SDK for
//! Rust:
//!
//! - `AwsObjectStore` - `ObjectStore` over aws-sdk-s3, with the HTTP client
//!   selected per the connection plan's verify spec (custom trust store for
//!   extracted or user-provided CA bundles)
//! - `SdkConnector` - `Connect` implementation that builds a client for a
//!   plan and probes it with ListBuckets, classifying certificate validation
//!   problems separately from every other failure
//! - `RustlsChainFetcher` - `FetchCertificateChain` via a rustls handshake
//!   with a chain-capturing verifier; no external tooling involved

mod chain;
mod client;
mod connector;
mod error;

pub use chain::RustlsChainFetcher;
pub use client::AwsObjectStore;
pub use connector::SdkConnector;
pub use error::AwsBackendError;

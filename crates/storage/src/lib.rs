//! Backend-agnostic core for s3-doctor connectivity diagnostics.
//!
//! This crate contains everything that does not depend on a concrete SDK:
//!
//! - **Trust-mode resolution** - mapping a requested trust mode and an
//!   optional CA bundle onto a concrete connection plan (scheme, verify spec)
//! - **Connection fallback** - the DefaultTls → CustomBundleTls →
//!   PlaintextNoTls procedure, modelled as an explicit sequence of tagged
//!   attempts over a `Connect` seam
//! - **Object-store trait** - the minimal S3 surface the diagnostics exercise
//! - **Diagnostic tasks** - folder marker, upload, verified download,
//!   listing, and cleanup, generic over any `ObjectStore`
//!
//! Backends (the AWS SDK implementation lives in `s3-doctor-storage-aws`)
//! plug in through the `Connect`, `FetchCertificateChain`, and `ObjectStore`
//! traits.

mod error;
mod fallback;
mod tasks;
mod traits;
mod trust;

pub use error::{ConnectError, StorageError};
pub use fallback::{
    establish_with_fallback, AttemptOutcome, Connect, Established, FallbackOptions,
    FetchCertificateChain,
};
pub use tasks::{cleanup, list_all_keys, run_scenario_tasks, scenario_file_key};
pub use traits::{ObjectInfo, ObjectStore};
pub use trust::{ConnectionPlan, TrustMode, VerifySpec};

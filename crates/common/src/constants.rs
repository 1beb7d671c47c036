//! Shared constants used across s3-doctor crates.

/// File the extracted server certificate chain is written to.
/// The fallback procedure threads this path into the custom-bundle retry.
pub const EXTRACTED_BUNDLE_FILE: &str = "storage.crt";

/// Default port for TLS endpoints that do not specify one.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Step label used for configuration messages.
pub const CONFIG_STEP: &str = "CONFIG";

/// Step label used for the final summary block.
pub const FINAL_MESSAGE_STEP: &str = "FINAL MESSAGE";

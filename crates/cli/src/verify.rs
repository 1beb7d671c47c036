//! The `verify` flow: exercise every trust mode explicitly.
//!
//! Each trust mode gets its own client and its own scenario folder under
//! `test/`; the object lifecycle runs once per mode. Afterwards the bucket
//! is listed and everything the scenarios created is deleted. Every failure
//! is reported and skipped, so all scenarios always run.

use s3_doctor_common::{EnvConfig, StepReporter, StepStatus};
use s3_doctor_storage::{
    cleanup, list_all_keys, run_scenario_tasks, ConnectError, ConnectionPlan, TrustMode,
};
use s3_doctor_storage_aws::AwsObjectStore;

pub async fn run(config: &EnvConfig) -> Result<(), ConnectError> {
    let mut reporter = StepReporter::stdout();
    let bucket = config.bucket.as_str();
    let mut created_keys: Vec<String> = Vec::new();

    for mode in TrustMode::FALLBACK_ORDER {
        let name = mode.scenario_name();
        reporter.blank();
        reporter.plain(format!("Testing configuration: {name}"));

        let plan = ConnectionPlan::resolve(&config.endpoint, mode, config.ca_bundle.as_deref());
        let store = match AwsObjectStore::from_plan(&plan, config).await {
            Ok(store) => store,
            Err(err) => {
                reporter.step(
                    name,
                    StepStatus::Error,
                    format!("Failed to create S3 client: {err}"),
                );
                reporter.step(
                    name,
                    StepStatus::Info,
                    format!("Skipping cleanup for {name} due to errors."),
                );
                continue;
            }
        };
        reporter.step(
            name,
            StepStatus::Info,
            format!("Created S3 client using {}.", plan.description()),
        );

        let folder = format!("test/{name}/");
        let content = scenario_content(mode);
        match run_scenario_tasks(&store, bucket, &folder, content, &mut reporter, name).await {
            Ok(keys) => created_keys.extend(keys),
            Err(err) => {
                reporter.step(
                    name,
                    StepStatus::Error,
                    format!("Error during S3 tasks for {folder}: {err}"),
                );
                reporter.step(
                    name,
                    StepStatus::Info,
                    format!("Skipping cleanup for {name} due to errors."),
                );
            }
        }
    }

    reporter.blank();
    reporter.plain("All files in bucket:");
    match default_tls_client(config).await {
        Ok(store) => match list_all_keys(&store, bucket).await {
            Ok(keys) => {
                for key in &keys {
                    reporter.step("LISTING", StepStatus::File, key);
                }
            }
            Err(err) => reporter.step(
                "LISTING",
                StepStatus::Error,
                format!("Failed to list all files: {err}"),
            ),
        },
        Err(err) => reporter.step(
            "LISTING",
            StepStatus::Error,
            format!("Failed to list all files: {err}"),
        ),
    }

    reporter.blank();
    reporter.plain("Starting cleanup...");
    match default_tls_client(config).await {
        Ok(store) => cleanup(&store, bucket, &created_keys, &mut reporter, "CLEANUP").await,
        Err(err) => reporter.step("CLEANUP", StepStatus::Error, format!("Cleanup failed: {err}")),
    }

    reporter.blank();
    reporter.plain("Script execution completed.");
    Ok(())
}

/// Listing and cleanup always go over plain default TLS.
async fn default_tls_client(config: &EnvConfig) -> Result<AwsObjectStore, ConnectError> {
    let plan = ConnectionPlan::resolve(&config.endpoint, TrustMode::DefaultTls, None);
    AwsObjectStore::from_plan(&plan, config)
        .await
        .map_err(ConnectError::from)
}

fn scenario_content(mode: TrustMode) -> &'static [u8] {
    match mode {
        TrustMode::DefaultTls => b"Content for TLS default connection.",
        TrustMode::CustomBundleTls => b"Content for TLS with custom certificate bundle.",
        TrustMode::PlaintextNoTls => b"Content for HTTP connection.",
    }
}

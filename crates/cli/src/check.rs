//! The `check` flow: connect through the TLS fallback chain, then run the
//! diagnostic steps against the bucket. Step failures are logged and
//! skipped; only a connection that cannot be established at all is fatal.

use std::io::Write;

use s3_doctor_common::{EnvConfig, StepReporter, StepStatus, CONFIG_STEP, FINAL_MESSAGE_STEP};
use s3_doctor_storage::{
    establish_with_fallback, ConnectError, Established, FallbackOptions, ObjectStore, StorageError,
    TrustMode,
};
use s3_doctor_storage_aws::{RustlsChainFetcher, SdkConnector};

const SAMPLE_CONTENT: &[u8] = b"Sample in-memory file content for testing.";
const SAMPLE_KEY: &str = "memory_file.txt";
const FOLDER_KEY: &str = "new_folder/";

const CA_BUNDLE_DOCS: &str =
    "https://docs.aws.amazon.com/cli/latest/userguide/cli-configure-files.html#cli-configure-files-settings";

pub async fn run(config: &EnvConfig) -> Result<(), ConnectError> {
    let mut reporter = StepReporter::stdout();

    if let Some(ref path) = config.ca_bundle {
        reporter.step(
            CONFIG_STEP,
            StepStatus::Info,
            format!("Using custom CA bundle: {}", path.display()),
        );
    }

    let connector = SdkConnector::new(config.clone());
    let fetcher = RustlsChainFetcher;
    let options = FallbackOptions::default();

    let established =
        establish_with_fallback(&config.endpoint, &connector, &fetcher, &options, &mut reporter)
            .await?;
    let store = &established.client;
    let bucket = config.bucket.as_str();

    run_step(&mut reporter, "Step 2", "Uploading file...", || {
        store.put_object(bucket, SAMPLE_KEY, SAMPLE_CONTENT)
    })
    .await;

    run_step(&mut reporter, "Step 3", "Downloading file...", || async {
        let downloaded = store.get_object(bucket, SAMPLE_KEY).await?;
        if downloaded != SAMPLE_CONTENT {
            return Err(StorageError::ContentMismatch {
                key: SAMPLE_KEY.to_string(),
                expected_len: SAMPLE_CONTENT.len(),
                actual_len: downloaded.len(),
            });
        }
        Ok(())
    })
    .await;

    run_step(&mut reporter, "Step 4", "Creating folder...", || {
        store.put_object(bucket, FOLDER_KEY, &[])
    })
    .await;

    let action = "Listing files...";
    reporter.step("Step 5", StepStatus::Info, action);
    match store.list_objects(bucket, FOLDER_KEY).await {
        Ok(objects) => {
            for info in &objects {
                reporter.step("Step 5", StepStatus::File, &info.key);
            }
            reporter.step(
                "Step 5",
                StepStatus::Success,
                format!("{action} completed successfully."),
            );
        }
        Err(err) => {
            reporter.step("Step 5", StepStatus::Error, format!("{action} failed: {err}"))
        }
    }

    print_summary(&mut reporter, &established, &options);
    Ok(())
}

/// Run one diagnostic step, reporting start and outcome. Failures are
/// reported and swallowed so the remaining steps still run.
async fn run_step<W, Fut>(
    reporter: &mut StepReporter<W>,
    step: &str,
    action: &str,
    task: impl FnOnce() -> Fut,
) where
    W: Write + Send,
    Fut: std::future::Future<Output = Result<(), StorageError>>,
{
    reporter.step(step, StepStatus::Info, action);
    match task().await {
        Ok(()) => reporter.step(
            step,
            StepStatus::Success,
            format!("{action} completed successfully."),
        ),
        Err(err) => reporter.step(step, StepStatus::Error, format!("{action} failed: {err}")),
    }
}

fn print_summary<W: Write, C>(
    reporter: &mut StepReporter<W>,
    established: &Established<C>,
    options: &FallbackOptions,
) {
    let mut messages: Vec<String> = Vec::new();

    if established.used_plaintext() {
        messages.push("SSL connection failed. Connected using HTTP instead.".to_string());
    }

    if established.plan.trust_mode == TrustMode::CustomBundleTls {
        messages.push(format!(
            "SSL connection succeeded using a custom CA bundle ({}).\n\
             Refer to AWS documentation for configuring CA bundles:\n{CA_BUNDLE_DOCS}",
            options.bundle_path.display()
        ));
    }

    // Remediation only applies when the default trust store was not enough.
    if established.used_plaintext() || established.used_extracted_bundle() {
        messages.push(format!(
            "Consider the following actions:\n\
             1. Provide a Custom CA Bundle. Learn more: {CA_BUNDLE_DOCS}\n\
             2. Correct the Certificate Chain. Refer to Kubernetes/OpenShift documentation:\n\
             https://kubernetes.io/docs/tasks/tls/managing-tls-in-a-cluster/\n\
             https://docs.openshift.com/container-platform/4.17/security/certificates/updating-ca-bundle.html"
        ));
    }

    for message in messages {
        reporter.step(FINAL_MESSAGE_STEP, StepStatus::Info, message);
    }
}

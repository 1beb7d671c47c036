//! Diagnostic task orchestration, generic over any `ObjectStore`.
//!
//! One scenario exercises the basic object lifecycle against a folder
//! prefix: create the folder marker, upload a file, download it back, and
//! verify the bytes match. Listing and cleanup helpers operate on whatever
//! the scenarios created.

use std::io::Write;

use s3_doctor_common::{StepReporter, StepStatus};

use crate::error::StorageError;
use crate::traits::ObjectStore;

/// Derive the test file name and full key for a scenario folder.
///
/// `"test/tls_default/"` yields `("file_test_tls_default.txt",
/// "test/tls_default/file_test_tls_default.txt")`.
pub fn scenario_file_key(folder: &str) -> (String, String) {
    let file_name = format!("file_{}.txt", folder.trim_matches('/').replace('/', "_"));
    let file_key = format!("{folder}{file_name}");
    (file_name, file_key)
}

/// Run the object lifecycle for one scenario folder.
///
/// # Arguments
/// * `store` - Object store backend
/// * `bucket` - Target bucket
/// * `folder` - Folder prefix with trailing slash (e.g. "test/tls_default/")
/// * `content` - Bytes to round-trip
/// * `reporter` - Console reporter; `step` labels every line
///
/// # Returns
/// The keys created (folder marker and file), for later cleanup. A
/// downloaded-content mismatch surfaces as `StorageError::ContentMismatch`
/// and is propagated, not swallowed.
pub async fn run_scenario_tasks<S, W>(
    store: &S,
    bucket: &str,
    folder: &str,
    content: &[u8],
    reporter: &mut StepReporter<W>,
    step: &str,
) -> Result<Vec<String>, StorageError>
where
    S: ObjectStore + ?Sized,
    W: Write + Send,
{
    let (_, file_key) = scenario_file_key(folder);

    store.put_object(bucket, folder, &[]).await?;
    reporter.step(step, StepStatus::Success, format!("Created folder: {folder}"));

    store.put_object(bucket, &file_key, content).await?;
    reporter.step(step, StepStatus::Success, format!("Uploaded file: {file_key}"));

    let downloaded = store.get_object(bucket, &file_key).await?;
    if downloaded != content {
        return Err(StorageError::ContentMismatch {
            key: file_key,
            expected_len: content.len(),
            actual_len: downloaded.len(),
        });
    }
    reporter.step(
        step,
        StepStatus::Success,
        format!("Downloaded and verified file: {file_key}"),
    );

    Ok(vec![folder.to_string(), file_key])
}

/// List every key in the bucket, in listing order.
pub async fn list_all_keys<S>(store: &S, bucket: &str) -> Result<Vec<String>, StorageError>
where
    S: ObjectStore + ?Sized,
{
    let objects = store.list_objects(bucket, "").await?;
    Ok(objects.into_iter().map(|obj| obj.key).collect())
}

/// Delete the given keys one at a time.
///
/// Per-key failures are reported and skipped; cleanup always runs to the end.
pub async fn cleanup<S, W>(
    store: &S,
    bucket: &str,
    keys: &[String],
    reporter: &mut StepReporter<W>,
    step: &str,
) where
    S: ObjectStore + ?Sized,
    W: Write + Send,
{
    for key in keys {
        match store.delete_object(bucket, key).await {
            Ok(()) => reporter.step(step, StepStatus::Success, format!("Deleted: {key}")),
            Err(err) => {
                reporter.step(step, StepStatus::Error, format!("Failed to delete {key}: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_file_key_flattens_folder() {
        let (name, key) = scenario_file_key("test/tls_default/");
        assert_eq!(name, "file_test_tls_default.txt");
        assert_eq!(key, "test/tls_default/file_test_tls_default.txt");
    }

    #[test]
    fn test_scenario_file_key_single_segment() {
        let (name, key) = scenario_file_key("new_folder/");
        assert_eq!(name, "file_new_folder.txt");
        assert_eq!(key, "new_folder/file_new_folder.txt");
    }
}

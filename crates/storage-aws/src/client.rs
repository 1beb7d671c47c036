//! aws-sdk-s3 implementation of the `ObjectStore` trait.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use aws_smithy_http_client::tls;

use s3_doctor_common::EnvConfig;
use s3_doctor_storage::{
    ConnectError, ConnectionPlan, ObjectInfo, ObjectStore, StorageError, VerifySpec,
};

use crate::error::{classify_sdk_error, AwsBackendError};

/// ObjectStore implementation using the AWS SDK for Rust.
///
/// The connection plan decides the transport: plaintext and system-trust
/// plans use the SDK's default HTTP client, bundle plans get a client whose
/// trust store contains only the bundle's certificates.
pub struct AwsObjectStore {
    s3_client: S3Client,
}

impl AwsObjectStore {
    /// Build a client for a resolved connection plan.
    ///
    /// # Arguments
    /// * `plan` - Endpoint, scheme, and verify spec for this attempt
    /// * `config` - Credentials and region from the environment
    pub async fn from_plan(
        plan: &ConnectionPlan,
        config: &EnvConfig,
    ) -> Result<Self, AwsBackendError> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "s3-doctor",
        );

        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&plan.endpoint);

        let loader = match &plan.verify {
            VerifySpec::Bundle(path) => {
                let pem = std::fs::read(path).map_err(|e| AwsBackendError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let trust_store = tls::TrustStore::empty().with_pem_certificate(pem);
                let tls_context = tls::TlsContext::builder()
                    .with_trust_store(trust_store)
                    .build()
                    .map_err(|e| AwsBackendError::TlsConfig {
                        message: e.to_string(),
                    })?;
                let http_client = aws_smithy_http_client::Builder::new()
                    .tls_provider(tls::Provider::Rustls(
                        tls::rustls_provider::CryptoMode::Ring,
                    ))
                    .tls_context(tls_context)
                    .build_https();
                loader.http_client(http_client)
            }
            // System trust (SDK default) or plaintext http - nothing to vary.
            VerifySpec::SystemTrust | VerifySpec::Disabled => loader,
        };

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            // S3-compatible stores generally route by path, not subdomain.
            .force_path_style(true)
            .build();

        Ok(Self {
            s3_client: S3Client::from_conf(s3_config),
        })
    }

    /// Create a client from an existing S3Client (for testing).
    pub fn from_client(s3_client: S3Client) -> Self {
        Self { s3_client }
    }

    /// Probe the connection with ListBuckets, classifying certificate
    /// validation failures separately from everything else.
    pub async fn probe(&self) -> Result<(), ConnectError> {
        self.s3_client
            .list_buckets()
            .send()
            .await
            .map(|_| ())
            .map_err(|err| classify_sdk_error(&err))
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|err| StorageError::Network {
                message: err.into_service_error().to_string(),
            })?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Network {
                        message: service_err.to_string(),
                    }
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Network {
                message: e.to_string(),
            })?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects: Vec<ObjectInfo> = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .s3_client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix);

            if let Some(ref token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| StorageError::Network {
                message: err.into_service_error().to_string(),
            })?;

            for obj in response.contents() {
                let last_modified: Option<i64> = obj
                    .last_modified()
                    .and_then(|dt| dt.to_millis().ok())
                    .map(|ms| ms / 1000);

                objects.push(ObjectInfo {
                    key: obj.key().unwrap_or_default().to_string(),
                    size: obj.size().map(|s| s as u64).unwrap_or(0),
                    last_modified,
                    etag: obj.e_tag().map(|s| s.to_string()),
                });
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(|t| t.to_string());
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.s3_client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| StorageError::Network {
                message: err.into_service_error().to_string(),
            })?;
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let response = self
            .s3_client
            .list_buckets()
            .send()
            .await
            .map_err(|err| StorageError::Network {
                message: err.into_service_error().to_string(),
            })?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(|n| n.to_string()))
            .collect())
    }
}

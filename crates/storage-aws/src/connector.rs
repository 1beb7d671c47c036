//! `Connect` implementation over the AWS backend.

use async_trait::async_trait;

use s3_doctor_common::EnvConfig;
use s3_doctor_storage::{Connect, ConnectError, ConnectionPlan};

use crate::client::AwsObjectStore;

/// Builds an `AwsObjectStore` for each connection plan and probes it with
/// ListBuckets before handing it back.
pub struct SdkConnector {
    config: EnvConfig,
}

impl SdkConnector {
    /// Create a connector using environment credentials and region.
    pub fn new(config: EnvConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connect for SdkConnector {
    type Client = AwsObjectStore;

    async fn connect(&self, plan: &ConnectionPlan) -> Result<AwsObjectStore, ConnectError> {
        let store = AwsObjectStore::from_plan(plan, &self.config)
            .await
            .map_err(ConnectError::from)?;
        log::info!("Created S3 client using {}.", plan.description());
        store.probe().await?;
        Ok(store)
    }
}

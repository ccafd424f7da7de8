//! AWS configuration shared by the live-stream clients
use aws_config::{BehaviorVersion, Region, SdkConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region hosting the IVS, IVS Chat and DynamoDB resources
    pub region: String,
    /// DynamoDB table holding channel records (partition key `arn`)
    pub table_name: String,
}

impl AwsConfig {
    pub fn new(region: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            table_name: table_name.into(),
        }
    }

    /// Load the shared SDK configuration pinned to the configured region.
    ///
    /// Credentials resolve through the default provider chain
    /// (environment, profile, container/instance role).
    pub async fn load_sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }
}

//! Clients for the managed services behind the live-stream broker
//!
//! Each external collaborator is an async trait so the orchestration layer
//! can be exercised without AWS:
//! - [`StreamingPlatform`]: live-video channels (Amazon IVS)
//! - [`ChatPlatform`]: chat rooms and tokens (Amazon IVS Chat)
//! - [`ChannelStore`]: channel to chat room records (Amazon DynamoDB)
//!
//! # Example
//!
//! ```no_run
//! use live_clients::{AwsConfig, LiveClients};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AwsConfig::new("ap-northeast-1", "IvsSimpleTable");
//!     let _clients = LiveClients::connect(&config).await;
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

pub mod chat;
pub mod config;
pub mod error;
pub mod ivs;
pub mod store;
pub mod types;

pub use chat::IvsChatPlatform;
pub use config::AwsConfig;
pub use error::ServiceError;
pub use ivs::IvsPlatform;
pub use store::DynamoChannelStore;
pub use types::*;

#[async_trait]
pub trait StreamingPlatform: Send + Sync {
    async fn create_channel(&self, policy: &ChannelPolicy) -> Result<CreatedChannel, ServiceError>;

    /// Fetch one page of channels; `next_token` is `None` on the last page.
    async fn list_channels(&self, next_token: Option<String>) -> Result<ChannelPage, ServiceError>;

    async fn get_channel(&self, arn: &str) -> Result<ChannelInfo, ServiceError>;

    /// Fails with [`ServiceError::NotBroadcasting`] when the channel is offline.
    async fn get_stream(&self, arn: &str) -> Result<LiveStream, ServiceError>;
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn create_room(&self) -> Result<ChatRoom, ServiceError>;

    async fn create_token(
        &self,
        room_arn: &str,
        user_id: &str,
        capabilities: &[ChatCapability],
    ) -> Result<ChatToken, ServiceError>;
}

#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn put_record(&self, record: &ChannelRecord) -> Result<(), ServiceError>;

    async fn get_record(&self, arn: &str) -> Result<Option<ChannelRecord>, ServiceError>;
}

/// The three AWS-backed collaborators built from one SDK configuration
#[derive(Clone)]
pub struct LiveClients {
    pub platform: Arc<dyn StreamingPlatform>,
    pub chat: Arc<dyn ChatPlatform>,
    pub store: Arc<dyn ChannelStore>,
}

impl LiveClients {
    pub async fn connect(config: &AwsConfig) -> Self {
        let sdk_config = config.load_sdk_config().await;

        tracing::info!(
            region = %config.region,
            table = %config.table_name,
            "Initialized IVS, IVS Chat and DynamoDB clients"
        );

        Self {
            platform: Arc::new(IvsPlatform::new(&sdk_config)),
            chat: Arc::new(IvsChatPlatform::new(&sdk_config)),
            store: Arc::new(DynamoChannelStore::new(&sdk_config, config.table_name.clone())),
        }
    }
}

//! DynamoDB implementation of [`ChannelStore`]
use crate::error::ServiceError;
use crate::types::ChannelRecord;
use crate::ChannelStore;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE: &str = "dynamodb";

/// Partition key of the channel table
pub const ARN_ATTRIBUTE: &str = "arn";
pub const CHAT_ROOM_ATTRIBUTE: &str = "chat_room_arn";

#[derive(Clone)]
pub struct DynamoChannelStore {
    client: Arc<Client>,
    table_name: String,
}

impl DynamoChannelStore {
    pub fn new(sdk_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new(sdk_config)),
            table_name: table_name.into(),
        }
    }
}

pub fn record_to_item(record: &ChannelRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ARN_ATTRIBUTE.to_string(),
            AttributeValue::S(record.arn.clone()),
        ),
        (
            CHAT_ROOM_ATTRIBUTE.to_string(),
            AttributeValue::S(record.chat_room_arn.clone()),
        ),
    ])
}

pub fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<ChannelRecord, ServiceError> {
    let string_attr = |name: &'static str| {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
            .ok_or_else(|| ServiceError::missing(SERVICE, name))
    };

    Ok(ChannelRecord {
        arn: string_attr(ARN_ATTRIBUTE)?,
        chat_room_arn: string_attr(CHAT_ROOM_ATTRIBUTE)?,
    })
}

#[async_trait]
impl ChannelStore for DynamoChannelStore {
    async fn put_record(&self, record: &ChannelRecord) -> Result<(), ServiceError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        info!(
            table = %self.table_name,
            channel_arn = %record.arn,
            chat_room_arn = %record.chat_room_arn,
            "Channel record stored"
        );

        Ok(())
    }

    async fn get_record(&self, arn: &str) -> Result<Option<ChannelRecord>, ServiceError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ARN_ATTRIBUTE, AttributeValue::S(arn.to_string()))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        match output.item() {
            Some(item) => record_from_item(item).map(Some),
            None => {
                debug!(table = %self.table_name, channel_arn = %arn, "No channel record");
                Ok(None)
            }
        }
    }
}

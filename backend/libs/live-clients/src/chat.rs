//! Amazon IVS Chat implementation of [`ChatPlatform`]
use crate::error::ServiceError;
use crate::types::{ChatCapability, ChatRoom, ChatToken};
use crate::ChatPlatform;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ivschat::types::ChatTokenCapability;
use aws_sdk_ivschat::Client;
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE: &str = "ivschat";

#[derive(Clone)]
pub struct IvsChatPlatform {
    client: Arc<Client>,
}

impl IvsChatPlatform {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Arc::new(Client::new(sdk_config)),
        }
    }
}

fn token_capability(capability: ChatCapability) -> ChatTokenCapability {
    match capability {
        ChatCapability::SendMessage => ChatTokenCapability::SendMessage,
        ChatCapability::DeleteMessage => ChatTokenCapability::DeleteMessage,
        ChatCapability::DisconnectUser => ChatTokenCapability::DisconnectUser,
    }
}

#[async_trait]
impl ChatPlatform for IvsChatPlatform {
    async fn create_room(&self) -> Result<ChatRoom, ServiceError> {
        let output = self
            .client
            .create_room()
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let arn = output
            .arn()
            .ok_or_else(|| ServiceError::missing(SERVICE, "arn"))?;

        info!(chat_room_arn = %arn, "IVS chat room created");

        Ok(ChatRoom {
            arn: arn.to_string(),
        })
    }

    async fn create_token(
        &self,
        room_arn: &str,
        user_id: &str,
        capabilities: &[ChatCapability],
    ) -> Result<ChatToken, ServiceError> {
        let output = self
            .client
            .create_chat_token()
            .room_identifier(room_arn)
            .user_id(user_id)
            .set_capabilities(Some(
                capabilities.iter().copied().map(token_capability).collect(),
            ))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let token = output
            .token()
            .ok_or_else(|| ServiceError::missing(SERVICE, "token"))?;

        debug!(chat_room_arn = %room_arn, user_id = %user_id, "Chat token minted");

        Ok(ChatToken {
            token: token.to_string(),
        })
    }
}

//! Data exchanged with the streaming, chat and persistence collaborators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyMode {
    Low,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Basic,
    Standard,
}

/// Creation policy for a new channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    pub latency_mode: LatencyMode,
    pub channel_type: ChannelType,
    pub insecure_ingest: bool,
}

impl ChannelPolicy {
    /// Low latency, basic tier, RTMP (insecure) ingest allowed.
    pub const fn low_latency_basic() -> Self {
        Self {
            latency_mode: LatencyMode::Low,
            channel_type: ChannelType::Basic,
            insecure_ingest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedChannel {
    pub arn: String,
    pub ingest_endpoint: String,
    pub stream_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub arns: Vec<String>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub arn: String,
    pub playback_url: String,
}

/// A stream currently being broadcast on a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStream {
    pub channel_arn: String,
    pub playback_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub arn: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCapability {
    SendMessage,
    DeleteMessage,
    DisconnectUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatToken {
    pub token: String,
}

/// Persisted channel to chat room mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub arn: String,
    pub chat_room_arn: String,
}

impl ChannelRecord {
    pub fn new(arn: impl Into<String>, chat_room_arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            chat_room_arn: chat_room_arn.into(),
        }
    }
}

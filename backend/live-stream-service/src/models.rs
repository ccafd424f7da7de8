//! Response payloads of the live-stream endpoints

use serde::{Deserialize, Serialize};

/// `POST /start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartLiveStreamResponse {
    pub ingest_endpoint: String,
    pub stream_key: String,
}

/// `GET /streams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLiveStreamsResponse {
    pub arns: Vec<String>,
}

/// `GET /streams?live=true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivePlaybackUrlsResponse {
    pub playback_urls: Vec<String>,
}

/// `GET /stream?arn=<channel arn>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStreamDetailResponse {
    pub arn: String,
    pub playback_url: String,
    pub chat_token: String,
}

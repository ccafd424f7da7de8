//! Amazon IVS implementation of [`StreamingPlatform`]
use crate::error::ServiceError;
use crate::types::{
    ChannelInfo, ChannelPage, ChannelPolicy, ChannelType, CreatedChannel, LatencyMode, LiveStream,
};
use crate::StreamingPlatform;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ivs::types::{ChannelLatencyMode, ChannelType as IvsChannelType};
use aws_sdk_ivs::Client;
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE: &str = "ivs";

#[derive(Clone)]
pub struct IvsPlatform {
    client: Arc<Client>,
}

impl IvsPlatform {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Arc::new(Client::new(sdk_config)),
        }
    }
}

fn latency_mode(mode: LatencyMode) -> ChannelLatencyMode {
    match mode {
        LatencyMode::Low => ChannelLatencyMode::LowLatency,
        LatencyMode::Normal => ChannelLatencyMode::NormalLatency,
    }
}

fn channel_type(tier: ChannelType) -> IvsChannelType {
    match tier {
        ChannelType::Basic => IvsChannelType::BasicChannelType,
        ChannelType::Standard => IvsChannelType::StandardChannelType,
    }
}

#[async_trait]
impl StreamingPlatform for IvsPlatform {
    async fn create_channel(&self, policy: &ChannelPolicy) -> Result<CreatedChannel, ServiceError> {
        let output = self
            .client
            .create_channel()
            .latency_mode(latency_mode(policy.latency_mode))
            .r#type(channel_type(policy.channel_type))
            .insecure_ingest(policy.insecure_ingest)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let channel = output
            .channel()
            .ok_or_else(|| ServiceError::missing(SERVICE, "channel"))?;
        let arn = channel
            .arn()
            .ok_or_else(|| ServiceError::missing(SERVICE, "channel.arn"))?;
        let ingest_endpoint = channel
            .ingest_endpoint()
            .ok_or_else(|| ServiceError::missing(SERVICE, "channel.ingestEndpoint"))?;
        let stream_key = output
            .stream_key()
            .and_then(|key| key.value())
            .ok_or_else(|| ServiceError::missing(SERVICE, "streamKey.value"))?;

        info!(channel_arn = %arn, "IVS channel created");

        Ok(CreatedChannel {
            arn: arn.to_string(),
            ingest_endpoint: ingest_endpoint.to_string(),
            stream_key: stream_key.to_string(),
        })
    }

    async fn list_channels(&self, next_token: Option<String>) -> Result<ChannelPage, ServiceError> {
        let output = self
            .client
            .list_channels()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let arns = output
            .channels()
            .iter()
            .map(|summary| {
                summary
                    .arn()
                    .map(str::to_string)
                    .ok_or_else(|| ServiceError::missing(SERVICE, "channels[].arn"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let next_token = output
            .next_token()
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        debug!(count = arns.len(), has_more = next_token.is_some(), "IVS channel page fetched");

        Ok(ChannelPage { arns, next_token })
    }

    async fn get_channel(&self, arn: &str) -> Result<ChannelInfo, ServiceError> {
        let output = self
            .client
            .get_channel()
            .arn(arn)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let playback_url = output
            .channel()
            .and_then(|channel| channel.playback_url())
            .ok_or_else(|| ServiceError::missing(SERVICE, "channel.playbackUrl"))?;

        Ok(ChannelInfo {
            arn: arn.to_string(),
            playback_url: playback_url.to_string(),
        })
    }

    async fn get_stream(&self, arn: &str) -> Result<LiveStream, ServiceError> {
        let output = self
            .client
            .get_stream()
            .channel_arn(arn)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(SERVICE, e))?;

        let playback_url = output
            .stream()
            .and_then(|stream| stream.playback_url())
            .ok_or_else(|| ServiceError::missing(SERVICE, "stream.playbackUrl"))?;

        Ok(LiveStream {
            channel_arn: arn.to_string(),
            playback_url: playback_url.to_string(),
        })
    }
}

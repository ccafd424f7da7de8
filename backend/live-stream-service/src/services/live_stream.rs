//! Live stream service (orchestration layer)
//!
//! Sequences the IVS, IVS Chat and DynamoDB calls behind each endpoint.
//! Calls within an operation are awaited one after another and the first
//! failure aborts the operation.

use crate::error::{AppError, Result};
use crate::models::{
    ListLiveStreamsResponse, LivePlaybackUrlsResponse, LiveStreamDetailResponse,
    StartLiveStreamResponse,
};
use live_clients::{
    AwsConfig, ChannelPolicy, ChannelRecord, ChannelStore, ChatCapability, ChatPlatform,
    LiveClients, ServiceError, StreamingPlatform,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Capabilities granted to anonymous viewers
const VIEWER_CAPABILITIES: &[ChatCapability] = &[ChatCapability::SendMessage];

#[derive(Clone)]
pub struct LiveStreamService {
    platform: Arc<dyn StreamingPlatform>,
    chat: Arc<dyn ChatPlatform>,
    store: Arc<dyn ChannelStore>,
}

impl LiveStreamService {
    pub fn new(
        platform: Arc<dyn StreamingPlatform>,
        chat: Arc<dyn ChatPlatform>,
        store: Arc<dyn ChannelStore>,
    ) -> Self {
        Self {
            platform,
            chat,
            store,
        }
    }

    pub fn with_clients(clients: LiveClients) -> Self {
        Self::new(clients.platform, clients.chat, clients.store)
    }

    /// Build the service against AWS using an explicit configuration.
    pub async fn from_config(config: &AwsConfig) -> Self {
        Self::with_clients(LiveClients::connect(config).await)
    }

    /// Create a channel and its chat room, then record the pairing.
    ///
    /// Nothing is rolled back when a later step fails; resources created by
    /// earlier steps are logged so they can be reclaimed.
    pub async fn start_live_stream(&self) -> Result<StartLiveStreamResponse> {
        let channel = self
            .platform
            .create_channel(&ChannelPolicy::low_latency_basic())
            .await?;

        let room = match self.chat.create_room().await {
            Ok(room) => room,
            Err(e) => {
                error!(
                    channel_arn = %channel.arn,
                    error = %e,
                    "Chat room creation failed; channel left without a record"
                );
                return Err(e.into());
            }
        };

        let record = ChannelRecord::new(channel.arn.clone(), room.arn.clone());
        if let Err(e) = self.store.put_record(&record).await {
            error!(
                channel_arn = %channel.arn,
                chat_room_arn = %room.arn,
                error = %e,
                "Channel record write failed; channel and chat room left orphaned"
            );
            return Err(e.into());
        }

        info!(channel_arn = %channel.arn, chat_room_arn = %room.arn, "Live stream started");

        Ok(StartLiveStreamResponse {
            ingest_endpoint: channel.ingest_endpoint,
            stream_key: channel.stream_key,
        })
    }

    /// Every channel ARN on the platform, in platform order across pages.
    pub async fn list_live_streams(&self) -> Result<ListLiveStreamsResponse> {
        let arns = self.all_channel_arns().await?;
        Ok(ListLiveStreamsResponse { arns })
    }

    /// Playback URLs of the channels currently broadcasting.
    ///
    /// Channels reported as not broadcasting or not found are skipped.
    pub async fn list_live_playback_urls(&self) -> Result<LivePlaybackUrlsResponse> {
        let arns = self.all_channel_arns().await?;

        let mut playback_urls = Vec::new();
        for arn in &arns {
            match self.platform.get_stream(arn).await {
                Ok(stream) => playback_urls.push(stream.playback_url),
                Err(e) if e.is_not_live() => {
                    debug!(channel_arn = %arn, reason = e.kind(), "Skipping channel that is not live");
                }
                Err(e) => {
                    warn!(channel_arn = %arn, error = %e, "Failed to fetch stream");
                    return Err(e.into());
                }
            }
        }

        Ok(LivePlaybackUrlsResponse { playback_urls })
    }

    /// Playback URL plus a chat token for a fresh anonymous viewer.
    pub async fn get_live_stream(&self, arn: Option<&str>) -> Result<LiveStreamDetailResponse> {
        let arn = arn
            .filter(|arn| !arn.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("missing required query parameter `arn`".into()))?;

        let channel = self.platform.get_channel(arn).await.map_err(|e| match e {
            ServiceError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e => e.into(),
        })?;

        let record = self
            .store
            .get_record(arn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("channel {arn} has no chat room record")))?;

        let user_id = Uuid::new_v4().to_string();
        let token = self
            .chat
            .create_token(&record.chat_room_arn, &user_id, VIEWER_CAPABILITIES)
            .await?;

        debug!(channel_arn = %arn, user_id = %user_id, "Issued viewer chat token");

        Ok(LiveStreamDetailResponse {
            arn: channel.arn,
            playback_url: channel.playback_url,
            chat_token: token.token,
        })
    }

    async fn all_channel_arns(&self) -> Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token = None;

        loop {
            let page = self.platform.list_channels(next_token.take()).await?;
            arns.extend(page.arns);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(arns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use live_clients::{ChannelInfo, ChannelPage, ChatRoom, ChatToken, CreatedChannel, LiveStream};
    use mockall::{mock, predicate::*, Sequence};

    mock! {
        pub Platform {}

        #[async_trait::async_trait]
        impl StreamingPlatform for Platform {
            async fn create_channel(&self, policy: &ChannelPolicy) -> std::result::Result<CreatedChannel, ServiceError>;
            async fn list_channels(&self, next_token: Option<String>) -> std::result::Result<ChannelPage, ServiceError>;
            async fn get_channel(&self, arn: &str) -> std::result::Result<ChannelInfo, ServiceError>;
            async fn get_stream(&self, arn: &str) -> std::result::Result<LiveStream, ServiceError>;
        }
    }

    mock! {
        pub Chat {}

        #[async_trait::async_trait]
        impl ChatPlatform for Chat {
            async fn create_room(&self) -> std::result::Result<ChatRoom, ServiceError>;
            async fn create_token(
                &self,
                room_arn: &str,
                user_id: &str,
                capabilities: &[ChatCapability],
            ) -> std::result::Result<ChatToken, ServiceError>;
        }
    }

    mock! {
        pub Store {}

        #[async_trait::async_trait]
        impl ChannelStore for Store {
            async fn put_record(&self, record: &ChannelRecord) -> std::result::Result<(), ServiceError>;
            async fn get_record(&self, arn: &str) -> std::result::Result<Option<ChannelRecord>, ServiceError>;
        }
    }

    fn service(platform: MockPlatform, chat: MockChat, store: MockStore) -> LiveStreamService {
        LiveStreamService::new(Arc::new(platform), Arc::new(chat), Arc::new(store))
    }

    fn created_channel() -> CreatedChannel {
        CreatedChannel {
            arn: "arn:aws:ivs:ap-northeast-1:123:channel/a1".into(),
            ingest_endpoint: "rtmp://x".into(),
            stream_key: "k1".into(),
        }
    }

    fn page(arns: &[&str], next_token: Option<&str>) -> ChannelPage {
        ChannelPage {
            arns: arns.iter().map(|a| a.to_string()).collect(),
            next_token: next_token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_start_live_stream_returns_ingest_details() {
        let mut platform = MockPlatform::new();
        platform
            .expect_create_channel()
            .withf(|policy| *policy == ChannelPolicy::low_latency_basic())
            .times(1)
            .returning(|_| Ok(created_channel()));

        let mut chat = MockChat::new();
        chat.expect_create_room().times(1).returning(|| {
            Ok(ChatRoom {
                arn: "arn:aws:ivschat:ap-northeast-1:123:room/r1".into(),
            })
        });

        let mut store = MockStore::new();
        store
            .expect_put_record()
            .withf(|record| {
                *record
                    == ChannelRecord::new(
                        "arn:aws:ivs:ap-northeast-1:123:channel/a1",
                        "arn:aws:ivschat:ap-northeast-1:123:room/r1",
                    )
            })
            .times(1)
            .returning(|_| Ok(()));

        let response = service(platform, chat, store).start_live_stream().await.unwrap();

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"ingest_endpoint":"rtmp://x","stream_key":"k1"}"#
        );
    }

    #[tokio::test]
    async fn test_start_live_stream_room_failure_skips_persistence() {
        let mut platform = MockPlatform::new();
        platform
            .expect_create_channel()
            .times(1)
            .returning(|_| Ok(created_channel()));

        let mut chat = MockChat::new();
        chat.expect_create_room().times(1).returning(|| {
            Err(ServiceError::from_code(
                "ivschat",
                Some("ServiceQuotaExceededException"),
                "too many rooms".into(),
            ))
        });

        let mut store = MockStore::new();
        store.expect_put_record().never();

        let err = service(platform, chat, store)
            .start_live_stream()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "throttled");
    }

    #[tokio::test]
    async fn test_start_live_stream_record_failure_returns_error() {
        let mut platform = MockPlatform::new();
        platform
            .expect_create_channel()
            .times(1)
            .returning(|_| Ok(created_channel()));

        let mut chat = MockChat::new();
        chat.expect_create_room().times(1).returning(|| {
            Ok(ChatRoom {
                arn: "arn:aws:ivschat:ap-northeast-1:123:room/r1".into(),
            })
        });

        let mut store = MockStore::new();
        store.expect_put_record().times(1).returning(|_| {
            Err(ServiceError::from_code(
                "dynamodb",
                Some("ResourceNotFoundException"),
                "no table".into(),
            ))
        });

        let err = service(platform, chat, store)
            .start_live_stream()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ServiceError::NotFound { service: "dynamodb", .. })));
        assert_eq!(err.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_start_live_stream_missing_room_resource_is_upstream_failure() {
        let mut platform = MockPlatform::new();
        platform
            .expect_create_channel()
            .times(1)
            .returning(|_| Ok(created_channel()));

        let mut chat = MockChat::new();
        chat.expect_create_room().times(1).returning(|| {
            Err(ServiceError::from_code(
                "ivschat",
                Some("ResourceNotFoundException"),
                "gone".into(),
            ))
        });

        let mut store = MockStore::new();
        store.expect_put_record().never();

        let err = service(platform, chat, store)
            .start_live_stream()
            .await
            .unwrap_err();

        assert_eq!(err.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_start_live_stream_channel_failure_stops_immediately() {
        let mut platform = MockPlatform::new();
        platform.expect_create_channel().times(1).returning(|_| {
            Err(ServiceError::from_code(
                "ivs",
                Some("AccessDeniedException"),
                "not allowed".into(),
            ))
        });

        let mut chat = MockChat::new();
        chat.expect_create_room().never();
        let mut store = MockStore::new();
        store.expect_put_record().never();

        let err = service(platform, chat, store)
            .start_live_stream()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ServiceError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_list_live_streams_exhausts_pages_in_order() {
        let mut seq = Sequence::new();
        let mut platform = MockPlatform::new();
        platform
            .expect_list_channels()
            .with(eq(None))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(page(&["a1"], Some("page-2"))));
        platform
            .expect_list_channels()
            .with(eq(Some("page-2".to_string())))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(page(&["a2", "a3"], None)));

        let response = service(platform, MockChat::new(), MockStore::new())
            .list_live_streams()
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"arns":["a1","a2","a3"]}"#
        );
    }

    #[tokio::test]
    async fn test_list_live_streams_treats_empty_token_as_last_page() {
        let mut platform = MockPlatform::new();
        platform
            .expect_list_channels()
            .times(1)
            .returning(|_| Ok(page(&[], Some(""))));

        let response = service(platform, MockChat::new(), MockStore::new())
            .list_live_streams()
            .await
            .unwrap();

        assert!(response.arns.is_empty());
    }

    #[tokio::test]
    async fn test_list_live_streams_page_failure_aborts() {
        let mut seq = Sequence::new();
        let mut platform = MockPlatform::new();
        platform
            .expect_list_channels()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(page(&["a1"], Some("page-2"))));
        platform
            .expect_list_channels()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ServiceError::from_code("ivs", None, "connection reset".into())));

        let result = service(platform, MockChat::new(), MockStore::new())
            .list_live_streams()
            .await;

        assert!(matches!(result, Err(AppError::Upstream(ServiceError::Sdk { .. }))));
    }

    #[tokio::test]
    async fn test_list_live_playback_urls_skips_offline_channels() {
        let mut platform = MockPlatform::new();
        platform
            .expect_list_channels()
            .times(1)
            .returning(|_| Ok(page(&["a1", "a2", "a3"], None)));
        platform.expect_get_stream().times(3).returning(|arn| match arn {
            "a1" => Ok(LiveStream {
                channel_arn: "a1".into(),
                playback_url: "https://play/a1.m3u8".into(),
            }),
            "a2" => Err(ServiceError::from_code(
                "ivs",
                Some("ChannelNotBroadcasting"),
                "offline".into(),
            )),
            _ => Err(ServiceError::from_code(
                "ivs",
                Some("ResourceNotFoundException"),
                "deleted".into(),
            )),
        });

        let response = service(platform, MockChat::new(), MockStore::new())
            .list_live_playback_urls()
            .await
            .unwrap();

        assert_eq!(response.playback_urls, vec!["https://play/a1.m3u8".to_string()]);
    }

    #[tokio::test]
    async fn test_list_live_playback_urls_other_errors_abort() {
        let mut platform = MockPlatform::new();
        platform
            .expect_list_channels()
            .times(1)
            .returning(|_| Ok(page(&["a1", "a2"], None)));
        platform.expect_get_stream().times(1).returning(|_| {
            Err(ServiceError::from_code(
                "ivs",
                Some("AccessDeniedException"),
                "denied".into(),
            ))
        });

        let result = service(platform, MockChat::new(), MockStore::new())
            .list_live_playback_urls()
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_live_stream_issues_fresh_tokens() {
        let mut platform = MockPlatform::new();
        platform
            .expect_get_channel()
            .with(eq("a1"))
            .times(2)
            .returning(|arn| {
                Ok(ChannelInfo {
                    arn: arn.to_string(),
                    playback_url: "https://play/a1.m3u8".into(),
                })
            });

        let mut store = MockStore::new();
        store
            .expect_get_record()
            .with(eq("a1"))
            .times(2)
            .returning(|arn| Ok(Some(ChannelRecord::new(arn, "room1"))));

        let mut chat = MockChat::new();
        chat.expect_create_token()
            .withf(|room, _, caps| room == "room1" && caps == [ChatCapability::SendMessage])
            .times(2)
            .returning(|_, user_id, _| {
                Ok(ChatToken {
                    token: format!("token-for-{user_id}"),
                })
            });

        let service = service(platform, chat, store);
        let first = service.get_live_stream(Some("a1")).await.unwrap();
        let second = service.get_live_stream(Some("a1")).await.unwrap();

        assert_eq!(first.arn, "a1");
        assert_eq!(first.playback_url, "https://play/a1.m3u8");
        assert!(first.chat_token.starts_with("token-for-"));
        assert_ne!(first.chat_token, second.chat_token);
    }

    #[tokio::test]
    async fn test_get_live_stream_without_record_fails() {
        let mut platform = MockPlatform::new();
        platform.expect_get_channel().times(1).returning(|arn| {
            Ok(ChannelInfo {
                arn: arn.to_string(),
                playback_url: "https://play/a1.m3u8".into(),
            })
        });

        let mut store = MockStore::new();
        store.expect_get_record().times(1).returning(|_| Ok(None));

        let mut chat = MockChat::new();
        chat.expect_create_token().never();

        let err = service(platform, chat, store)
            .get_live_stream(Some("a1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_live_stream_rejects_missing_arn_before_any_call() {
        // Mocks without expectations panic on any call.
        let service = service(MockPlatform::new(), MockChat::new(), MockStore::new());

        for arn in [None, Some(""), Some("   ")] {
            let err = service.get_live_stream(arn).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "arn = {arn:?}");
        }
    }

    #[tokio::test]
    async fn test_get_live_stream_forwards_arn_unchanged() {
        let mut platform = MockPlatform::new();
        platform
            .expect_get_channel()
            .with(eq(" a1 "))
            .times(1)
            .returning(|_| {
                Err(ServiceError::from_code(
                    "ivs",
                    Some("ValidationException"),
                    "invalid arn".into(),
                ))
            });

        let err = service(platform, MockChat::new(), MockStore::new())
            .get_live_stream(Some(" a1 "))
            .await
            .unwrap_err();

        assert_eq!(err.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_live_stream_unknown_channel_is_not_found() {
        let mut platform = MockPlatform::new();
        platform.expect_get_channel().times(1).returning(|_| {
            Err(ServiceError::from_code(
                "ivs",
                Some("ResourceNotFoundException"),
                "no such channel".into(),
            ))
        });

        let mut store = MockStore::new();
        store.expect_get_record().never();

        let err = service(platform, MockChat::new(), store)
            .get_live_stream(Some("missing"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "not_found");
    }
}

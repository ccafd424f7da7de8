//! Method + path dispatch table
//!
//! | Method | Path       | Operation                              |
//! |--------|------------|----------------------------------------|
//! | POST   | `/start`   | start a live stream                    |
//! | GET    | `/streams` | list channels (`live=true`: playback URLs) |
//! | GET    | `/stream`  | stream detail, requires `arn`          |
//!
//! Anything else is answered with `404 Not Found`. Matching is exact; there
//! is no prefix or wildcard matching.

use crate::error::Result;
use crate::services::LiveStreamService;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

pub const NOT_FOUND_BODY: &str = "Not Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StartLiveStream,
    ListLiveStreams,
    GetLiveStream,
}

impl Route {
    pub fn resolve(method: &str, path: &str) -> Option<Route> {
        match (method, path) {
            ("POST", "/start") => Some(Route::StartLiveStream),
            ("GET", "/streams") => Some(Route::ListLiveStreams),
            ("GET", "/stream") => Some(Route::GetLiveStream),
            _ => None,
        }
    }
}

/// Normalized description of an incoming HTTP request
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: HashMap::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.query_param(key), Some("true") | Some("1"))
    }
}

/// Normalized HTTP response: status code plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            status: 200,
            content_type: "application/json",
            body: serde_json::to_string(value)?,
        })
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain; charset=utf-8",
            body: NOT_FOUND_BODY.to_string(),
        }
    }
}

/// Route a request to its operation and serialize the result.
///
/// An unmatched route is a normal `404` response, not an error.
pub async fn dispatch(service: &LiveStreamService, request: &ApiRequest) -> Result<ApiResponse> {
    let Some(route) = Route::resolve(&request.method, &request.path) else {
        debug!(method = %request.method, path = %request.path, "No route matched");
        return Ok(ApiResponse::not_found());
    };

    match route {
        Route::StartLiveStream => ApiResponse::json(&service.start_live_stream().await?),
        Route::ListLiveStreams if request.flag("live") => {
            ApiResponse::json(&service.list_live_playback_urls().await?)
        }
        Route::ListLiveStreams => ApiResponse::json(&service.list_live_streams().await?),
        Route::GetLiveStream => {
            ApiResponse::json(&service.get_live_stream(request.query_param("arn")).await?)
        }
    }
}

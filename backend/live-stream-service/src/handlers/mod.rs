//! HTTP adapter for the live-stream broker
//!
//! actix-web hands every request to [`handle`], which normalizes it into an
//! [`ApiRequest`] and lets [`dispatch`] pick the operation. Route matching
//! stays in the dispatch table instead of actix's router.

use crate::error::AppError;
use crate::routes::{dispatch, ApiRequest, ApiResponse, Route};
use crate::services::LiveStreamService;
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use std::collections::HashMap;

impl From<ApiResponse> for HttpResponse {
    fn from(response: ApiResponse) -> Self {
        let status =
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status)
            .content_type(response.content_type)
            .body(response.body)
    }
}

/// The query string is only parsed for requests that match a route, so an
/// unmatched request always gets the plain 404.
fn normalize(req: &HttpRequest) -> Result<ApiRequest, AppError> {
    let mut request = ApiRequest::new(req.method().as_str(), req.path());

    if Route::resolve(&request.method, &request.path).is_some() {
        request.query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map_err(|e| AppError::BadRequest(format!("invalid query string: {e}")))?
            .into_inner();
    }

    Ok(request)
}

/// Default service: every method and path lands here.
pub async fn handle(
    req: HttpRequest,
    service: web::Data<LiveStreamService>,
) -> Result<HttpResponse, AppError> {
    let request = normalize(&req)?;
    let response = dispatch(&service, &request).await?;
    Ok(response.into())
}

/// Cross-origin policy: any origin may call the broker with GET or POST.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}

/// Register the broker on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::to(handle));
}

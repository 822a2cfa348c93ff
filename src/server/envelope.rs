// src/server/envelope.rs

//! The fixed response envelope shared by every action route: standard action
//! headers, CORS, and the `ActionError` body for failures.

use crate::config::ActionConfig;
use crate::core::errors::ActionChainError;
use crate::core::protocol::ActionError;
use axum::Json;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};
use url::Url;

pub const X_ACTION_VERSION: HeaderName = HeaderName::from_static("x-action-version");
pub const X_BLOCKCHAIN_IDS: HeaderName = HeaderName::from_static("x-blockchain-ids");

const ALLOW_METHODS: &str = "GET,POST,PUT,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, Content-Encoding, Accept-Encoding, X-Accept-Action-Version, X-Accept-Blockchain-Ids";
const EXPOSE_HEADERS: &str = "X-Action-Version, X-Blockchain-Ids";

/// The headers attached to every response of the action server.
pub fn action_headers(config: &ActionConfig) -> anyhow::Result<Vec<(HeaderName, HeaderValue)>> {
    Ok(vec![
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
        (
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSE_HEADERS),
        ),
        (CONTENT_TYPE, HeaderValue::from_static("application/json")),
        (
            X_ACTION_VERSION,
            HeaderValue::from_str(&config.action_version)?,
        ),
        (
            X_BLOCKCHAIN_IDS,
            HeaderValue::from_str(&config.blockchain_id)?,
        ),
    ])
}

impl IntoResponse for ActionChainError {
    fn into_response(self) -> Response {
        match &self {
            ActionChainError::Validation(_)
            | ActionChainError::Verification(_)
            | ActionChainError::MethodNotSupported => info!("Rejected action request: {}", self),
            _ => warn!("Action request failed: {}", self),
        }
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(ActionError::new(self.client_message()))).into_response()
    }
}

/// Determines the public origin used for absolute URLs in responses.
///
/// A configured `public_url` wins. Otherwise the request's `Host` header is used,
/// with the scheme taken from `X-Forwarded-Proto` when a proxy sets it.
pub fn resolve_origin(public_url: Option<&Url>, headers: &HeaderMap, fallback: &Url) -> Url {
    if let Some(url) = public_url {
        return url.clone();
    }

    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty());
    let Some(host) = host else {
        return fallback.clone();
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| matches!(*s, "http" | "https"))
        .unwrap_or("http");

    Url::parse(&format!("{scheme}://{host}")).unwrap_or_else(|_| fallback.clone())
}

// src/server/routes.rs

//! HTTP routing for the action chain.

use super::envelope::{action_headers, resolve_origin};
use crate::config::ActionConfig;
use crate::core::actions::{
    self, ACTION_PATH, ACTIONS_MANIFEST_PATH, ActionContext, NEXT_ACTION_PATH,
};
use crate::core::errors::ActionChainError;
use crate::core::metrics;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use url::Url;

/// Immutable state shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: ActionContext,
    /// Origin configured for absolute URLs, if any.
    pub public_url: Option<Url>,
    /// Origin used when neither `public_url` nor a `Host` header is available.
    pub fallback_origin: Url,
}

/// Builds the action router with the response envelope applied to every route.
pub fn router(state: AppState, action: &ActionConfig) -> anyhow::Result<Router> {
    let mut app = Router::new()
        .route(
            ACTION_PATH,
            get(get_action).post(post_action).options(preflight),
        )
        .route(
            NEXT_ACTION_PATH,
            get(get_next_action)
                .post(post_next_action)
                .options(preflight),
        )
        .route(ACTIONS_MANIFEST_PATH, get(get_manifest).options(preflight))
        .with_state(state);

    for (name, value) in action_headers(action)? {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }
    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Converts a handler result into a response and records its outcome.
fn respond<T: Serialize>(route: &str, result: Result<T, ActionChainError>) -> Response {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::ACTION_REQUESTS_TOTAL
        .with_label_values(&[route, outcome])
        .inc();

    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn preflight() -> Response {
    respond("preflight", Ok(Value::Null))
}

/// Maps a body the framework could not buffer, such as one over the size limit,
/// onto the regular error envelope.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ActionChainError> {
    body.map_err(|rejection| ActionChainError::MalformedBody(rejection.body_text()))
}

async fn get_action() -> Response {
    respond("action", Ok(actions::memo_action()))
}

async fn post_action(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match read_body(body) {
        Ok(body) => actions::builder::handle_post(&state.ctx, &body).await,
        Err(e) => Err(e),
    };
    respond("post", result)
}

async fn get_next_action() -> Response {
    respond::<Value>("next-action", Err(ActionChainError::MethodNotSupported))
}

async fn post_next_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let origin = resolve_origin(state.public_url.as_ref(), &headers, &state.fallback_origin);
    let result = match read_body(body) {
        Ok(body) => actions::completion::handle_next_action(&state.ctx, &body, &origin).await,
        Err(e) => Err(e),
    };
    respond("next-action", result)
}

async fn get_manifest() -> Response {
    respond("manifest", Ok(actions::actions_manifest()))
}

use std::{any::Any, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{error::ErrorCode, protocol::WordResponse};
use tracing::error;

use crate::app_state::AppState;

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn random_word(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<WordResponse>) {
    let reply = state.words.fetch_word().await;
    (reply.status, Json(reply.body))
}

/// Renders a handler panic as the same structured 500 the endpoint uses for
/// its own faults.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };
    error!(%detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(WordResponse::from_code(ErrorCode::Internal)),
    )
        .into_response()
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

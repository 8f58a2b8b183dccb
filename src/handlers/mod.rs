//! Webhook endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET`  | `/api/webflow-to-algolia` | liveness, `{"ok":true}` |
//! | `POST` | `/api/webflow-to-algolia` | [`item_webhook`] |
//! | `POST` | `/api/whalesync-to-algolia` | [`payload_webhook`] |
//! | `GET`  | `/health` | `OK` |
//!
//! Any other method on a webhook path gets 405. Every handled outcome, including
//! ignored and skipped events, answers 200 so senders only retry real failures.

pub mod item_webhook;
pub mod payload_webhook;

pub use item_webhook::*;
pub use payload_webhook::*;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::clients::{AlgoliaClient, WebflowClient};
use crate::mapping::CollectionRouter;
use crate::models::SyncError;

/// Dependencies injected into every webhook handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CollectionRouter>,
    pub cms: WebflowClient,
    pub index: AlgoliaClient,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/webflow-to-algolia", get(liveness).post(handle_item_webhook))
        .route("/api/whalesync-to-algolia", post(handle_payload_webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> Json<WebhookReply> {
    Json(WebhookReply::Alive { ok: true })
}

async fn health_check() -> &'static str {
    "OK"
}

/// JSON bodies returned with HTTP 200.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum WebhookReply {
    Alive {
        ok: bool,
    },
    Ignored {
        /// `true`, or a short reason string.
        ignored: Value,
    },
    Deleted {
        deleted: String,
    },
    Skipped {
        skipped: String,
    },
    Indexed {
        indexed: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl WebhookReply {
    pub fn ignored() -> Self {
        Self::Ignored { ignored: Value::Bool(true) }
    }

    pub fn ignored_because(reason: &str) -> Self {
        Self::Ignored { ignored: Value::String(reason.to_string()) }
    }
}

/// Unexpected failure, reported as HTTP 500 `{"error": ...}`.
#[derive(Debug)]
pub struct AppError(SyncError);

impl From<SyncError> for AppError {
    fn from(e: SyncError) -> Self {
        Self(e)
    }
}

// Unreadable bodies are reported like any other failure instead of axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SyncError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "webhook failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

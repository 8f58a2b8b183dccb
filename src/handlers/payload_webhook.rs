use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{AppError, AppState, WebhookReply};
use crate::mapping::RouteDecision;
use crate::models::SyncToolPayload;

/// Whalesync webhook: the record arrives in the body, so no CMS fetch is needed.
pub async fn handle_payload_webhook(
    State(state): State<AppState>,
    body: Result<Json<SyncToolPayload>, JsonRejection>,
) -> Result<Json<WebhookReply>, AppError> {
    let Json(payload) = body?;
    let Some(decision) = state.router.route_payload(&payload)? else {
        tracing::debug!(collection = %payload.collection, "payload webhook: unknown collection ignored");
        return Ok(Json(WebhookReply::ignored_because("unknown collection")));
    };

    let reply = match decision {
        RouteDecision::Delete(object_id) => {
            state.index.delete_object(&object_id).await?;
            tracing::info!(collection = %payload.collection, item_id = %object_id, "payload webhook: deleted inactive record");
            WebhookReply::Deleted { deleted: object_id }
        }
        RouteDecision::Skip(reason) => {
            tracing::info!(collection = %payload.collection, item_id = %payload.record.item_id, reason, "payload webhook: skipped");
            WebhookReply::Skipped { skipped: reason.to_string() }
        }
        RouteDecision::Index(record) => {
            state.index.save_object(&record).await?;
            tracing::info!(collection = %payload.collection, item_id = %record.object_id, url = %record.url, "payload webhook: indexed");
            WebhookReply::Indexed {
                indexed: record.object_id,
                operation: payload.operation,
                url: Some(record.url),
            }
        }
    };

    Ok(Json(reply))
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{AppError, AppState, WebhookReply};
use crate::mapping::RouteDecision;
use crate::models::ItemNotification;

/// Webflow item-change webhook: fetch the item, then index, delete or skip it.
pub async fn handle_item_webhook(
    State(state): State<AppState>,
    body: Result<Json<ItemNotification>, JsonRejection>,
) -> Result<Json<WebhookReply>, AppError> {
    let Json(event) = body?;
    let ItemNotification { collection_id, item_id } = event;

    if item_id.trim().is_empty() {
        tracing::info!(collection_id = %collection_id, "item webhook: skipped event without item id");
        return Ok(Json(WebhookReply::Skipped { skipped: "missing item id".to_string() }));
    }

    if state.router.table().by_collection_id(&collection_id).is_none() {
        tracing::debug!(collection_id = %collection_id, item_id = %item_id, "item webhook: unknown collection ignored");
        return Ok(Json(WebhookReply::ignored()));
    }

    let item = state.cms.get_item(&collection_id, &item_id).await?;

    let reply = match state.router.route_item(&collection_id, &item)? {
        None => WebhookReply::ignored(),
        Some(RouteDecision::Delete(object_id)) => {
            state.index.delete_object(&object_id).await?;
            tracing::info!(collection_id = %collection_id, item_id = %object_id, "item webhook: deleted unpublished item");
            WebhookReply::Deleted { deleted: object_id }
        }
        Some(RouteDecision::Skip(reason)) => {
            tracing::info!(collection_id = %collection_id, item_id = %item.id, reason, "item webhook: skipped");
            WebhookReply::Skipped { skipped: reason.to_string() }
        }
        Some(RouteDecision::Index(record)) => {
            state.index.save_object(&record).await?;
            tracing::info!(collection_id = %collection_id, item_id = %record.object_id, url = %record.url, "item webhook: indexed");
            WebhookReply::Indexed { indexed: record.object_id, operation: None, url: None }
        }
    };

    Ok(Json(reply))
}

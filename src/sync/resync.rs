use serde::Serialize;

use crate::clients::{AlgoliaClient, WebflowClient};
use crate::mapping::{CollectionRouter, RouteDecision};
use crate::models::*;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedItem {
    pub item_id: String,
    pub collection_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedItem {
    pub item_id: String,
    pub collection_id: String,
    pub error: String,
}

/// Outcome of one full resync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResyncReport {
    pub collections: usize,
    pub fetched: usize,
    pub indexed: usize,
    /// Drafts and archived items left out of the upload.
    pub excluded: usize,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
}

/// Maps every published item of every configured collection and writes them in one batch.
///
/// Any transport error aborts the run before anything is written. Items whose date
/// cannot be parsed are left out and reported in `failed`.
pub async fn run_resync(
    router: &CollectionRouter,
    cms: &WebflowClient,
    index: &AlgoliaClient,
) -> Result<ResyncReport> {
    let mut report = ResyncReport::default();
    let mut records = Vec::new();

    for collection in router.table().iter() {
        let items = cms.fetch_collection_items(&collection.collection_id).await?;
        tracing::info!(
            collection_id = %collection.collection_id,
            content_type = %collection.content_type,
            items = items.len(),
            "resync: fetched collection"
        );
        report.collections += 1;
        report.fetched += items.len();

        for item in &items {
            match router.map_item(collection, item) {
                Ok(RouteDecision::Index(record)) => records.push(record),
                Ok(RouteDecision::Delete(_)) => report.excluded += 1,
                Ok(RouteDecision::Skip(reason)) => {
                    tracing::warn!(
                        item_id = %item.id,
                        collection_id = %collection.collection_id,
                        name = item.text_field("name").unwrap_or_default(),
                        reason,
                        "resync: skipping item"
                    );
                    report.skipped.push(SkippedItem {
                        item_id: item.id.clone(),
                        collection_id: collection.collection_id.clone(),
                        reason: reason.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        item_id = %item.id,
                        collection_id = %collection.collection_id,
                        error = %e,
                        "resync: item could not be mapped"
                    );
                    report.failed.push(FailedItem {
                        item_id: item.id.clone(),
                        collection_id: collection.collection_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    report.indexed = index.save_objects(&records).await?;
    tracing::info!(
        indexed = report.indexed,
        excluded = report.excluded,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "resync: complete"
    );
    Ok(report)
}

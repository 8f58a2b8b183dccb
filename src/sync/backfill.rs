use serde::Serialize;
use serde_json::Value;

use crate::clients::AlgoliaClient;
use crate::mapping::is_absolute_url;
use crate::models::*;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BackfillReport {
    pub scanned: usize,
    pub updated: usize,
}

/// Patches for every hit whose `url` is a bare path. Hits without a string `url` are left alone.
pub fn plan_url_fixes(hits: &[Value], site_base_url: &str) -> Vec<UrlPatch> {
    let base = site_base_url.trim_end_matches('/');
    hits.iter()
        .filter_map(|hit| {
            let object_id = hit.get("objectID")?.as_str()?;
            let url = hit.get("url")?.as_str()?;
            if url.is_empty() || is_absolute_url(url) {
                return None;
            }
            let path = if url.starts_with('/') { url.to_string() } else { format!("/{}", url) };
            Some(UrlPatch {
                object_id: object_id.to_string(),
                url: format!("{}{}", base, path),
            })
        })
        .collect()
}

/// Rewrites relative record URLs into absolute ones with a single partial-update batch.
pub async fn run_url_backfill(index: &AlgoliaClient, site_base_url: &str) -> Result<BackfillReport> {
    let hits = index.browse_objects().await?;
    let patches = plan_url_fixes(&hits, site_base_url);

    if patches.is_empty() {
        tracing::info!(index = %index.index_name(), scanned = hits.len(), "backfill: no URLs needed fixing");
        return Ok(BackfillReport { scanned: hits.len(), updated: 0 });
    }

    let updated = index.partial_update_objects(&patches).await?;
    tracing::info!(index = %index.index_name(), scanned = hits.len(), updated, "backfill: URLs updated");
    Ok(BackfillReport { scanned: hits.len(), updated })
}

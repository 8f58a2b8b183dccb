use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{body_preview, build_http_client};
use crate::config::{HttpSettings, IndexSettings};
use crate::models::*;

/// Writer (and scanner) for a single named Algolia index.
#[derive(Clone)]
pub struct AlgoliaClient {
    client: Client,
    base_url: String,
    app_id: String,
    api_key: String,
    index_name: String,
}

#[derive(Debug, Deserialize)]
struct BrowsePage {
    #[serde(default)]
    hits: Vec<Value>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Serialize)]
struct BatchOperation<'a, T: Serialize> {
    action: &'static str,
    body: &'a T,
}

#[derive(Serialize)]
struct BatchRequest<'a, T: Serialize> {
    requests: Vec<BatchOperation<'a, T>>,
}

impl AlgoliaClient {
    pub fn new(index: &IndexSettings, http: &HttpSettings) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http)?,
            base_url: index.host.trim_end_matches('/').to_string(),
            app_id: index.app_id.clone(),
            api_key: index.admin_key.clone(),
            index_name: index.index_name.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn index_url(&self, suffix: &str) -> String {
        format!(
            "{}/1/indexes/{}/{}",
            self.base_url,
            urlencoding::encode(&self.index_name),
            suffix
        )
    }

    // Ids that would collapse into an index-level route once placed in the path.
    fn object_url(&self, object_id: &str) -> Result<String> {
        if matches!(object_id.trim(), "" | "." | "..") {
            return Err(SyncError::InvalidObjectId(object_id.to_string()));
        }
        Ok(self.index_url(&urlencoding::encode(object_id)))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
    }

    async fn check(response: Response, operation: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let preview = body_preview(&body);
        tracing::error!(http.status = %status, operation, body.preview = %preview, "algolia request failed");
        Err(SyncError::Index { status: status.as_u16(), message: preview })
    }

    /// Creates or fully replaces one record.
    pub async fn save_object(&self, record: &SearchRecord) -> Result<()> {
        let url = self.object_url(&record.object_id)?;
        let request = self.authed(self.client.put(&url)).json(record);
        Self::check(request.send().await?, "saveObject").await?;
        tracing::debug!(object_id = %record.object_id, "algolia: saved object");
        Ok(())
    }

    /// Deletes one record. Deleting an absent object succeeds.
    pub async fn delete_object(&self, object_id: &str) -> Result<()> {
        let url = self.object_url(object_id)?;
        let request = self.authed(self.client.delete(&url));
        Self::check(request.send().await?, "deleteObject").await?;
        tracing::debug!(object_id, "algolia: deleted object");
        Ok(())
    }

    /// Upserts every record in one batch request. No request is sent for an empty slice.
    pub async fn save_objects(&self, records: &[SearchRecord]) -> Result<usize> {
        self.batch(records, "updateObject").await
    }

    /// Applies attribute-level updates to existing records only.
    pub async fn partial_update_objects(&self, patches: &[UrlPatch]) -> Result<usize> {
        self.batch(patches, "partialUpdateObjectNoCreate").await
    }

    async fn batch<T: Serialize>(&self, bodies: &[T], action: &'static str) -> Result<usize> {
        if bodies.is_empty() {
            return Ok(0);
        }
        let batch = BatchRequest {
            requests: bodies.iter().map(|body| BatchOperation { action, body }).collect(),
        };
        let url = self.index_url("batch");
        let request = self.authed(self.client.post(&url)).json(&batch);
        Self::check(request.send().await?, action).await?;
        tracing::info!(index = %self.index_name, action, count = bodies.len(), "algolia: batch applied");
        Ok(bodies.len())
    }

    /// Reads every record of the index, following browse cursors to the end.
    pub async fn browse_objects(&self) -> Result<Vec<Value>> {
        let url = self.index_url("browse");
        let mut hits = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = match &cursor {
                Some(c) => json!({ "cursor": c }),
                None => json!({}),
            };
            let request = self.authed(self.client.post(&url)).json(&body);
            let response = Self::check(request.send().await?, "browse").await?;
            let page: BrowsePage = response.json().await?;
            hits.extend(page.hits);

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(index = %self.index_name, scanned = hits.len(), "algolia: browse complete");
        Ok(hits)
    }
}

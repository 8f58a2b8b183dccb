use reqwest::{Client, RequestBuilder, Response};

use super::{body_preview, build_http_client};
use crate::config::{CmsSettings, HttpSettings};
use crate::models::*;

/// Value of the `accept-version` header required by the Webflow v2 API.
pub const WEBFLOW_API_VERSION: &str = "2.0.0";

#[derive(Clone)]
pub struct WebflowClient {
    client: Client,
    base_url: String,
    api_token: String,
    page_size: u32,
}

impl WebflowClient {
    pub fn new(cms: &CmsSettings, http: &HttpSettings) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http)?,
            base_url: cms.api_base.trim_end_matches('/').to_string(),
            api_token: cms.api_token.clone(),
            page_size: cms.page_size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("accept-version", WEBFLOW_API_VERSION)
            .header("Accept", "application/json")
    }

    async fn check(response: Response, url: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let preview = body_preview(&body);
        tracing::error!(http.status = %status, url = %url, body.preview = %preview, "webflow request failed");
        Err(SyncError::Cms { status: status.as_u16(), message: preview })
    }

    /// Fetches one item; there is no fallback source, so any failure is returned as-is.
    pub async fn get_item(&self, collection_id: &str, item_id: &str) -> Result<CmsItem> {
        let url = format!(
            "{}/v2/collections/{}/items/{}",
            self.base_url,
            urlencoding::encode(collection_id),
            urlencoding::encode(item_id)
        );
        tracing::debug!(collection_id, item_id, "webflow: fetching item");
        let response = Self::check(self.get(&url).send().await?, &url).await?;
        Ok(response.json().await?)
    }

    pub async fn list_items_page(&self, collection_id: &str, limit: u32, offset: u32) -> Result<Vec<CmsItem>> {
        let url = format!(
            "{}/v2/collections/{}/items",
            self.base_url,
            urlencoding::encode(collection_id)
        );
        let request = self.get(&url).query(&[("limit", limit), ("offset", offset)]);
        let response = Self::check(request.send().await?, &url).await?;
        let page: ItemPage = response.json().await?;
        Ok(page.items)
    }

    /// All items of a collection in API order.
    ///
    /// Pages advance by `page_size`; a page shorter than requested is the last one.
    /// A failed page aborts the whole listing.
    pub async fn fetch_collection_items(&self, collection_id: &str) -> Result<Vec<CmsItem>> {
        let limit = self.page_size;
        let mut offset = 0u32;
        let mut all_items = Vec::new();

        loop {
            let items = self.list_items_page(collection_id, limit, offset).await?;
            let received = items.len();
            tracing::debug!(collection_id, offset, received, "webflow: fetched page");
            all_items.extend(items);

            if received < limit as usize {
                break;
            }
            offset += limit;
        }

        Ok(all_items)
    }
}

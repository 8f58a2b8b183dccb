use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Webflow CMS item as returned by the v2 items API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CmsItem {
    pub id: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub field_data: Map<String, Value>,
}

impl CmsItem {
    /// Non-empty string value of a field, if any.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.field_data
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.field_data.get(name)
    }

    pub fn is_unpublished(&self) -> bool {
        self.is_draft || self.is_archived
    }
}

/// One page of `GET /v2/collections/{id}/items`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPage {
    #[serde(default)]
    pub items: Vec<CmsItem>,
}

/// Webflow item-change notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemNotification {
    pub collection_id: String,
    pub item_id: String,
}

/// Whalesync webhook body carrying a flattened copy of the record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncToolPayload {
    pub collection: String,
    #[serde(default)]
    pub operation: Option<String>,
    pub record: SyncToolRecord,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SyncToolRecord {
    #[serde(rename = "Item ID")]
    pub item_id: String,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Body Content", default)]
    pub body: Option<String>,
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Slug", default)]
    pub slug: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// Status value Whalesync uses for published records.
pub const ACTIVE_STATUS: &str = "Active";

impl SyncToolRecord {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }
}

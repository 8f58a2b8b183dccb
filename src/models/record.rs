use serde::{Deserialize, Serialize};

/// Flat record stored in the Algolia index, keyed by the source item id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    pub body: String,
    pub source: Option<String>,
    pub content_type: String,
    pub exclusive: bool,
    pub date: String,
    pub timestamp: i64,
    pub url: String,
}

/// Partial update rewriting only the `url` attribute of an existing record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlPatch {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub url: String,
}

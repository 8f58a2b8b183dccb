use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Result, SyncError};

/// One source collection and the shape of the search records it produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Webflow collection id, used by the item webhook and the resync job.
    pub collection_id: String,
    /// Collection name as sent by the Whalesync webhook, if that tool syncs it.
    #[serde(default)]
    pub sync_name: Option<String>,
    pub content_type: String,
    pub url_prefix: String,
    #[serde(default = "default_date_field")]
    pub date_field: String,
    #[serde(default)]
    pub exclusive_field: Option<String>,
}

fn default_date_field() -> String {
    "date".to_string()
}

impl CollectionConfig {
    fn new(
        collection_id: &str,
        sync_name: Option<&str>,
        content_type: &str,
        url_prefix: &str,
        exclusive_field: Option<&str>,
    ) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            sync_name: sync_name.map(str::to_string),
            content_type: content_type.to_string(),
            url_prefix: url_prefix.to_string(),
            date_field: default_date_field(),
            exclusive_field: exclusive_field.map(str::to_string),
        }
    }
}

/// The routing table shared by every entry point.
#[derive(Debug, Clone)]
pub struct CollectionTable {
    entries: Vec<CollectionConfig>,
}

impl CollectionTable {
    /// Validates and normalizes a list of entries.
    pub fn new(entries: Vec<CollectionConfig>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for mut entry in entries {
            if entry.collection_id.trim().is_empty() {
                return Err(SyncError::Configuration("collection_id must not be empty".into()));
            }
            if !ids.insert(entry.collection_id.clone()) {
                return Err(SyncError::Configuration(format!(
                    "duplicate collection_id '{}'",
                    entry.collection_id
                )));
            }
            if let Some(name) = &entry.sync_name {
                if !names.insert(name.clone()) {
                    return Err(SyncError::Configuration(format!("duplicate sync_name '{}'", name)));
                }
            }
            if entry.date_field.trim().is_empty() {
                entry.date_field = default_date_field();
            }
            entry.url_prefix = normalize_prefix(&entry.url_prefix);
            normalized.push(entry);
        }

        Ok(Self { entries: normalized })
    }

    /// Reads a JSON array of entries, replacing the built-in table.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<CollectionConfig> = serde_json::from_str(&content)?;
        if entries.is_empty() {
            return Err(SyncError::Configuration(format!(
                "collections file {} contains no entries",
                path.display()
            )));
        }
        Self::new(entries)
    }

    pub fn builtin() -> Self {
        let entries = vec![
            CollectionConfig::new("6810f8ac48ac573ed368cc26", Some("News"), "news", "/member/news/", None),
            CollectionConfig::new(
                "6810f93700e7c73c9f48f52f",
                Some("Articles & Reports"),
                "articlesreports",
                "/member/articles-reports/",
                Some("is_this_an_iads_exclusive"),
            ),
            CollectionConfig::new(
                "6811137ec06846bb5c41e37b",
                Some("Books & Conferences"),
                "booksconferences",
                "/member/books-conferences/",
                None,
            ),
            CollectionConfig::new(
                "6811ed82712ca3755b871d5d",
                None,
                "iadsmembernews",
                "/member/iads-member-news/",
                None,
            ),
            CollectionConfig::new(
                "681b35f6db9abacfac4d0337",
                Some("White Papers"),
                "whitepaper",
                "/member/white-papers/",
                None,
            ),
        ];
        Self { entries }
    }

    pub fn by_collection_id(&self, collection_id: &str) -> Option<&CollectionConfig> {
        self.entries.iter().find(|c| c.collection_id == collection_id)
    }

    pub fn by_sync_name(&self, name: &str) -> Option<&CollectionConfig> {
        self.entries
            .iter()
            .find(|c| c.sync_name.as_deref() == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionConfig> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CollectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

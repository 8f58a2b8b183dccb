use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::*;

/// What a single change means for the index. Exactly one per routed event.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    Index(SearchRecord),
    Delete(String),
    Skip(&'static str),
}

/// Maps source items into search records according to the collection table.
///
/// Publish status always comes from the item itself (`isDraft`/`isArchived`,
/// or the payload `Status`), never from the name of the event that fired.
#[derive(Debug, Clone)]
pub struct CollectionRouter {
    table: CollectionTable,
    site_base_url: String,
}

impl CollectionRouter {
    pub fn new(table: CollectionTable, site_base_url: &str) -> Result<Self> {
        if !is_absolute_url(site_base_url) {
            return Err(SyncError::Configuration(format!(
                "site base URL '{}' is not an absolute URL",
                site_base_url
            )));
        }
        Ok(Self {
            table,
            site_base_url: site_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn table(&self) -> &CollectionTable {
        &self.table
    }

    pub fn site_base_url(&self) -> &str {
        &self.site_base_url
    }

    /// Routes a fetched CMS item. `Ok(None)` means the collection is not synced.
    pub fn route_item(&self, collection_id: &str, item: &CmsItem) -> Result<Option<RouteDecision>> {
        let Some(config) = self.table.by_collection_id(collection_id) else {
            return Ok(None);
        };
        self.map_item(config, item).map(Some)
    }

    pub fn map_item(&self, config: &CollectionConfig, item: &CmsItem) -> Result<RouteDecision> {
        if item.id.trim().is_empty() {
            return Ok(RouteDecision::Skip("missing item id"));
        }
        if item.is_unpublished() {
            return Ok(RouteDecision::Delete(item.id.clone()));
        }

        let Some(raw_date) = item.text_field(&config.date_field) else {
            return Ok(RouteDecision::Skip("missing date"));
        };
        let Some(slug) = item.text_field("slug") else {
            return Ok(RouteDecision::Skip("missing slug"));
        };

        let exclusive = config
            .exclusive_field
            .as_deref()
            .and_then(|field| item.field(field))
            .map(is_truthy)
            .unwrap_or(false);

        Ok(RouteDecision::Index(SearchRecord {
            object_id: item.id.clone(),
            title: item.text_field("name").unwrap_or_default().to_string(),
            body: item.text_field("body").unwrap_or_default().to_string(),
            source: item.text_field("source").map(str::to_string),
            content_type: config.content_type.clone(),
            exclusive,
            date: raw_date.to_string(),
            timestamp: to_timestamp(raw_date)?,
            url: self.canonical_url(config, slug),
        }))
    }

    /// Routes a Whalesync payload. `Ok(None)` means the collection is not synced.
    pub fn route_payload(&self, payload: &SyncToolPayload) -> Result<Option<RouteDecision>> {
        let Some(config) = self.table.by_sync_name(&payload.collection) else {
            return Ok(None);
        };
        let record = &payload.record;

        // Rows not yet pushed to the CMS carry no id and have nothing to write or delete.
        if record.item_id.trim().is_empty() {
            return Ok(Some(RouteDecision::Skip("missing item id")));
        }
        if !record.is_active() {
            return Ok(Some(RouteDecision::Delete(record.item_id.clone())));
        }

        let (Some(raw_date), Some(slug)) = (non_empty(&record.date), non_empty(&record.slug)) else {
            return Ok(Some(RouteDecision::Skip("missing date or slug")));
        };

        Ok(Some(RouteDecision::Index(SearchRecord {
            object_id: record.item_id.clone(),
            title: non_empty(&record.title).unwrap_or_default().to_string(),
            body: non_empty(&record.body).unwrap_or_default().to_string(),
            source: non_empty(&record.source).map(str::to_string),
            content_type: config.content_type.clone(),
            exclusive: false,
            date: raw_date.to_string(),
            timestamp: to_timestamp(raw_date)?,
            url: self.canonical_url(config, slug),
        })))
    }

    pub fn canonical_url(&self, config: &CollectionConfig, slug: &str) -> String {
        format!(
            "{}{}{}",
            self.site_base_url,
            config.url_prefix,
            slug.trim().trim_start_matches('/')
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Epoch seconds (floored) for a publish date; unparseable input is a hard error.
pub fn to_timestamp(raw: &str) -> Result<i64> {
    parse_date(raw).map(|dt| dt.timestamp())
}

pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(SyncError::InvalidDate(raw.to_string()))
}

/// True when the string carries a scheme, i.e. it is not a bare path.
pub fn is_absolute_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok()
}

// Loose truthiness for CMS switch fields, which may arrive as bools, strings or numbers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

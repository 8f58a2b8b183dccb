use std::path::PathBuf;

use crate::models::{CollectionTable, Result, SyncError};

pub const DEFAULT_INDEX_NAME: &str = "content2";
pub const DEFAULT_SITE_BASE_URL: &str = "https://www.iads.org";
pub const DEFAULT_WEBFLOW_API_BASE: &str = "https://api.webflow.com";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Largest `limit` the Webflow v2 list endpoint honours.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Settings shared by every outbound HTTP client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    // None leaves reqwest's default in place
    pub timeout_ms: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct CmsSettings {
    pub api_token: String,
    pub api_base: String,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct IndexSettings {
    pub app_id: String,
    pub admin_key: String,
    pub index_name: String,
    pub host: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub site_base_url: String,
    pub collections_file: Option<PathBuf>,
    pub http: HttpSettings,
    pub cms: CmsSettings,
    pub index: IndexSettings,
}

fn get(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn require(key: &str) -> Result<String> {
    get(key).ok_or_else(|| SyncError::Configuration(format!("missing required environment variable {}", key)))
}

impl HttpSettings {
    pub fn from_env() -> Self {
        let timeout_ms = get("HTTP_TIMEOUT_MS").and_then(|s| s.parse().ok());
        let user_agent = get("HTTP_USER_AGENT").unwrap_or_else(|| "content-sync-service/1.0".to_string());
        Self { timeout_ms, user_agent }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_ms: None, user_agent: "content-sync-service/1.0".to_string() }
    }
}

impl CmsSettings {
    pub fn from_env() -> Result<Self> {
        let api_token = require("WEBFLOW_API_TOKEN")?;
        let api_base = get("WEBFLOW_API_BASE").unwrap_or_else(|| DEFAULT_WEBFLOW_API_BASE.to_string());
        let page_size: u32 = get("WEBFLOW_PAGE_SIZE").and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(SyncError::Configuration(format!(
                "WEBFLOW_PAGE_SIZE must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        Ok(Self { api_token, api_base, page_size })
    }
}

impl IndexSettings {
    pub fn from_env() -> Result<Self> {
        let app_id = require("ALGOLIA_APP_ID")?;
        let admin_key = require("ALGOLIA_ADMIN_KEY")?;
        let index_name = get("ALGOLIA_INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());
        let host = get("ALGOLIA_HOST").unwrap_or_else(|| format!("https://{}.algolia.net", app_id));
        Ok(Self { app_id, admin_key, index_name, host })
    }
}

/// Base URL of the public site, used to make record URLs absolute.
pub fn site_base_url_from_env() -> String {
    get("SITE_BASE_URL").unwrap_or_else(|| DEFAULT_SITE_BASE_URL.to_string())
}

impl Config {
    /// Full configuration for the webhook server and the resync job.
    pub fn from_env() -> Result<Self> {
        let cms = CmsSettings::from_env()?;
        let index = IndexSettings::from_env()?;
        let port: u16 = get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        Ok(Self {
            port,
            site_base_url: site_base_url_from_env(),
            collections_file: get("COLLECTIONS_FILE").map(PathBuf::from),
            http: HttpSettings::from_env(),
            cms,
            index,
        })
    }

    pub fn load_collections(&self) -> Result<CollectionTable> {
        match &self.collections_file {
            Some(path) => CollectionTable::from_file(path),
            None => Ok(CollectionTable::builtin()),
        }
    }
}

pub mod collection;
pub mod item;
pub mod record;

pub use collection::*;
pub use item::*;
pub use record::*;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Webflow API error ({status}): {message}")]
    Cms { status: u16, message: String },

    #[error("Algolia API error ({status}): {message}")]
    Index { status: u16, message: String },

    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Invalid object ID: {0:?}")]
    InvalidObjectId(String),

    #[error("Invalid webhook body: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

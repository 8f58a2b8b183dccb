pub mod algolia;
pub mod webflow;

pub use algolia::*;
pub use webflow::*;

use std::time::Duration;

use reqwest::Client;

use crate::config::HttpSettings;
use crate::models::Result;

pub(crate) fn build_http_client(http: &HttpSettings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(http.user_agent.clone());
    if let Some(ms) = http.timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    Ok(builder.build()?)
}

const PREVIEW_LIMIT: usize = 500;

pub(crate) fn body_preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_LIMIT {
        let head: String = body.chars().take(PREVIEW_LIMIT).collect();
        format!("{}…<truncated>", head)
    } else {
        body.to_string()
    }
}

//! Keeps the Algolia content index in step with Webflow CMS collections.
//!
//! Entry points: the Webflow item webhook, the Whalesync payload webhook, a full
//! resync job and a one-shot URL backfill. All of them route items through the
//! shared [`mapping::CollectionRouter`].

pub mod clients;
pub mod config;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod sync;

// Convenient re-exports for tests and external callers
pub use clients::*;
pub use config::*;
pub use handlers::*;
pub use mapping::*;
pub use models::*;
pub use sync::*;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "content-sync-service", version, about = "Sync Webflow CMS content into Algolia")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the Webflow and Whalesync webhooks (default)
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Re-index every published item of every configured collection
    Resync,
    /// Rewrite relative record URLs in the index to absolute ones
    BackfillUrls,
}

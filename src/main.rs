use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::{Cli, Command};
use content_sync_service::clients::{AlgoliaClient, WebflowClient};
use content_sync_service::config::{site_base_url_from_env, Config, HttpSettings, IndexSettings};
use content_sync_service::handlers::{app, AppState};
use content_sync_service::mapping::CollectionRouter;
use content_sync_service::sync::{run_resync, run_url_backfill};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Platform-provided env wins over a local .env
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(port).await,
        Command::Resync => resync().await,
        Command::BackfillUrls => backfill_urls().await,
    }
}

fn build_router(cfg: &Config) -> anyhow::Result<CollectionRouter> {
    let table = cfg.load_collections()?;
    tracing::info!(collections = table.len(), site = %cfg.site_base_url, "Loaded collection table");
    Ok(CollectionRouter::new(table, &cfg.site_base_url)?)
}

async fn serve(port_override: Option<u16>) -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let port = port_override.unwrap_or(cfg.port);

    let state = AppState {
        router: Arc::new(build_router(&cfg)?),
        cms: WebflowClient::new(&cfg.cms, &cfg.http)?,
        index: AlgoliaClient::new(&cfg.index, &cfg.http)?,
    };
    tracing::info!(index = %cfg.index.index_name, "Configured Algolia index");

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(port, "Port is already in use. Try changing PORT or stop the other process.");
            }
            return Err(e.into());
        }
    };
    tracing::info!(port, "Webhook service listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn resync() -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let router = build_router(&cfg)?;
    let cms = WebflowClient::new(&cfg.cms, &cfg.http)?;
    let index = AlgoliaClient::new(&cfg.index, &cfg.http)?;

    let report = run_resync(&router, &cms, &index).await?;
    tracing::info!(
        collections = report.collections,
        fetched = report.fetched,
        indexed = report.indexed,
        excluded = report.excluded,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Indexed {} records",
        report.indexed
    );
    Ok(())
}

async fn backfill_urls() -> anyhow::Result<()> {
    let index_settings = IndexSettings::from_env()?;
    let site_base_url = site_base_url_from_env();
    if !content_sync_service::mapping::is_absolute_url(&site_base_url) {
        anyhow::bail!("SITE_BASE_URL must be an absolute URL, got '{}'", site_base_url);
    }
    let index = AlgoliaClient::new(&index_settings, &HttpSettings::from_env())?;

    let report = run_url_backfill(&index, &site_base_url).await?;
    tracing::info!(scanned = report.scanned, updated = report.updated, "URL backfill finished");
    Ok(())
}

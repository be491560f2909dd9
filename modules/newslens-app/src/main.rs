use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newslens_app::clients::{HttpAnalysisBackend, HttpArticleSource, HttpNewsStore};
use newslens_app::prescrape::{self, PrescrapeConfig};
use newslens_app::{router, AppState, Pipeline};
use newslens_common::{env_or, port_or, ServiceUrls};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let host = env_or("APPLICATION_HOST", "0.0.0.0");
    let port = port_or("APPLICATION_PORT", 8010);

    let urls = ServiceUrls::from_env();
    let pipeline = Pipeline::new(
        Arc::new(HttpNewsStore::new(&urls.store_url)),
        Arc::new(HttpArticleSource::new(&urls.scraper_url)),
        Arc::new(HttpAnalysisBackend::new(urls.clone())),
    );

    if let Some(config) = PrescrapeConfig::from_env() {
        tokio::spawn(prescrape::run(pipeline.clone(), config));
    }

    let app = router(Arc::new(AppState {
        pipeline,
    }));

    let addr = format!("{host}:{port}");
    info!("NewsLens application service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

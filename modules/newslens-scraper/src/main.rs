use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newslens_common::{env_or, port_or};
use newslens_scraper::{router, AppState, Extractor};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let host = env_or("SCRAPER_HOST", "0.0.0.0");
    let port = port_or("SCRAPER_PORT", 8015);

    let app = router(Arc::new(AppState {
        extractor: Extractor::new(),
    }));

    let addr = format!("{host}:{port}");
    info!("NewsLens scraper service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

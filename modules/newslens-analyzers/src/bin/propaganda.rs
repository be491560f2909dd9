use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hf_client::HfClient;
use newslens_analyzers::{propaganda_router, AppState};
use newslens_common::{env_or, port_or, required_env};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let host = env_or("PROPAGANDA_HOST", "0.0.0.0");
    let port = port_or("PROPAGANDA_PORT", 8014);

    let app = propaganda_router(Arc::new(AppState {
        hf: HfClient::new(&required_env("HF_API_KEY")),
    }));

    let addr = format!("{host}:{port}");
    info!("NewsLens propaganda service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

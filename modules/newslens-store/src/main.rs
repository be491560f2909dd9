use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newslens_common::{port_or, required_env};
use newslens_store::{router, AppState, NewsStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let database_url = required_env("DATABASE_URL");
    let host = newslens_common::env_or("STORE_HOST", "0.0.0.0");
    let port = port_or("STORE_PORT", 8011);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    let store = NewsStore::new(pool);
    store.migrate().await?;

    let app = router(Arc::new(AppState { store }));

    let addr = format!("{host}:{port}");
    info!("NewsLens store service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

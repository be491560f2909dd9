use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use llm_client::{ChatClient, GROQ_API_URL, PERPLEXITY_API_URL};
use newslens_common::{env_or, port_or, required_env};
use newslens_factcheck::{router, AppState, FactChecker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newslens=info".parse()?))
        .init();

    let host = env_or("FACTCHECK_HOST", "0.0.0.0");
    let port = port_or("FACTCHECK_PORT", 8016);

    let deepseek = ChatClient::new(
        &env_or("GROQ_API_URL", GROQ_API_URL),
        &required_env("GROQ_API_KEY"),
    );
    let sonar = ChatClient::new(
        &env_or("PERPLEXITY_API_URL", PERPLEXITY_API_URL),
        &required_env("PERPLEXITY_API_KEY"),
    );

    let app = router(Arc::new(AppState {
        checker: FactChecker::new(deepseek, sonar),
    }));

    let addr = format!("{host}:{port}");
    info!("NewsLens fact-check service starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

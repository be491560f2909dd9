use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::warn;

use newslens_common::NewsLensError;

use crate::extract::Extractor;

pub struct AppState {
    pub extractor: Extractor,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/scraper", get(health))
        .route("/scraper/get-article", get(get_article))
        .route("/scraper/get-latest-articles", get(get_latest_articles))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Deserialize)]
struct ArticleQuery {
    url: Option<String>,
}

#[derive(Deserialize)]
struct LatestQuery {
    num_articles: Option<usize>,
}

async fn get_article(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArticleQuery>,
) -> impl IntoResponse {
    let Some(url) = params.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "No URL provided"})),
        )
            .into_response();
    };

    match state.extractor.extract_article(&url).await {
        Ok(article) => Json(article).into_response(),
        Err(e @ (NewsLensError::Validation(_) | NewsLensError::Scraping(_))) => {
            warn!(url = %url, error = %e, "Article extraction rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid URL format / Unsupported site"})),
            )
                .into_response()
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Article extraction failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_latest_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LatestQuery>,
) -> impl IntoResponse {
    let per_source = params.num_articles.unwrap_or(10);

    match state.extractor.latest_articles(per_source).await {
        Ok(latest) => Json(latest).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to retrieve latest articles");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to retrieve latest articles"})),
            )
                .into_response()
        }
    }
}

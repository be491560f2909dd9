//! Axum routers for the three inference pass-through services. Each runs as
//! its own binary on its own port but shares the chunking and aggregation
//! code in this crate.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::warn;

use hf_client::HfClient;
use newslens_common::{NewsLensError, TextInput};

pub struct AppState {
    pub hf: HfClient,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

fn error_response(context: &str, e: NewsLensError) -> Response {
    match e {
        NewsLensError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": msg})),
        )
            .into_response(),
        e => {
            warn!(error = %e, "{context} failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"detail": e.to_string()})),
            )
                .into_response()
        }
    }
}

pub fn sentiment_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sentiment", get(health))
        .route("/sentiment/analyze_sentiment", post(analyze_sentiment))
        .with_state(state)
}

pub fn emotion_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/emotion", get(health))
        .route("/emotion/analyze_emotion", post(analyze_emotion))
        .with_state(state)
}

pub fn propaganda_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/propaganda", get(health))
        .route("/propaganda/analyze_propaganda", post(analyze_propaganda))
        .with_state(state)
}

async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> Response {
    match crate::sentiment::analyze_sentiment(&state.hf, &input.text).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("Sentiment analysis", e),
    }
}

async fn analyze_emotion(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> Response {
    match crate::emotion::analyze_emotion(&state.hf, &input.text).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("Emotion analysis", e),
    }
}

async fn analyze_propaganda(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> Response {
    match crate::propaganda::analyze_propaganda(&state.hf, &input.text).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("Propaganda analysis", e),
    }
}

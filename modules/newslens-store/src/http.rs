use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use newslens_common::{FactCheckItem, UrlInput};

use crate::store::NewsStore;

pub struct AppState {
    pub store: NewsStore,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/database", get(health))
        .route("/database/check_exists", post(check_exists))
        .route("/database", post(create_news))
        .route("/database/getAll", get(get_all))
        .route("/database/getByURL", post(get_by_url))
        .route("/database/getByID/{news_id}", get(get_by_id))
        .route("/database/sentiment", put(put_sentiment))
        .route("/database/emotion", put(put_emotion))
        .route("/database/propaganda", put(put_propaganda))
        .route("/database/factcheck", put(put_factcheck))
        .route("/database/summarise", put(put_summarise))
        .route("/database/ModelDataSummary", put(put_data_summary))
        .route("/database/{news_id}", delete(delete_by_id))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

// --- Update payloads ---

#[derive(Deserialize)]
struct SentimentUpdate {
    url: String,
    sentiment_result: serde_json::Value,
}

#[derive(Deserialize)]
struct EmotionUpdate {
    url: String,
    emotion_result: serde_json::Value,
}

#[derive(Deserialize)]
struct PropagandaUpdate {
    url: String,
    propaganda_result: serde_json::Value,
}

#[derive(Deserialize)]
struct FactCheckUpdate {
    url: String,
    factcheck_result: Vec<FactCheckItem>,
}

#[derive(Deserialize)]
struct SummariseUpdate {
    url: String,
    summarise_result: String,
}

#[derive(Deserialize)]
struct DataSummaryUpdate {
    url: String,
    data_summary: serde_json::Value,
}

#[derive(Deserialize)]
struct CreateRequest {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

// --- Handlers ---

async fn check_exists(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UrlInput>,
) -> impl IntoResponse {
    match state.store.url_exists(&body.url).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"exists": true}))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"exists": false})),
        ),
        Err(e) => {
            warn!(url = %body.url, error = %e, "Existence check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}

/// 200 with the new record's id, or 201 with the existing record when the
/// URL was already stored.
async fn create_news(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRequest>,
) -> impl IntoResponse {
    match state.store.get_by_url(&body.url).await {
        Ok(Some(existing)) => {
            return (StatusCode::CREATED, Json(existing)).into_response();
        }
        Ok(None) => {}
        Err(e) => {
            warn!(url = %body.url, error = %e, "Create pre-check failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match state.store.create(&body.url, &body.title, &body.content).await {
        Ok(record) => (
            StatusCode::OK,
            Json(serde_json::json!({"id": record.id})),
        )
            .into_response(),
        Err(e) => {
            warn!(url = %body.url, error = %e, "Failed to create news record");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get_all().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list news records");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_by_url(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UrlInput>,
) -> impl IntoResponse {
    match state.store.get_by_url(&body.url).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "News not found"})),
        )
            .into_response(),
        Err(e) => {
            warn!(url = %body.url, error = %e, "Failed to load news record");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = news_id.parse::<Uuid>() else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "News not found"})),
        )
            .into_response();
    };

    match state.store.get_by_id(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "News not found"})),
        )
            .into_response(),
        Err(e) => {
            warn!(id = %id, error = %e, "Failed to load news record");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn delete_by_id(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.delete_by_id(news_id).await {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(id = %news_id, error = %e, "Failed to delete news record");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn update_response(url: &str, field: &str, result: newslens_common::error::Result<bool>) -> axum::response::Response {
    match result {
        Ok(true) => Json(serde_json::json!({"updated": true})).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "News not found"})),
        )
            .into_response(),
        Err(e) => {
            warn!(url = %url, field = %field, error = %e, "Failed to update analysis result");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn put_sentiment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SentimentUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_sentiment(&body.url, &body.sentiment_result).await;
    update_response(&body.url, "sentiment_result", result)
}

async fn put_emotion(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EmotionUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_emotion(&body.url, &body.emotion_result).await;
    update_response(&body.url, "emotion_result", result)
}

async fn put_propaganda(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PropagandaUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_propaganda(&body.url, &body.propaganda_result).await;
    update_response(&body.url, "propaganda_result", result)
}

async fn put_factcheck(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FactCheckUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_factcheck(&body.url, &body.factcheck_result).await;
    update_response(&body.url, "factcheck_result", result)
}

async fn put_summarise(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummariseUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_summary(&body.url, &body.summarise_result).await;
    update_response(&body.url, "summarise_result", result)
}

async fn put_data_summary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DataSummaryUpdate>,
) -> impl IntoResponse {
    let result = state.store.update_data_summary(&body.url, &body.data_summary).await;
    update_response(&body.url, "data_summary", result)
}

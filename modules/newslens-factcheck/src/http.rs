use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::checker::FactChecker;

pub struct AppState {
    pub checker: FactChecker,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/factcheck", get(health))
        .route("/factcheck/predict/statements", post(predict_statements))
        .route("/factcheck/predict/fact-check", post(predict_fact_check))
        .route("/factcheck/summarise", post(summarise))
        .route("/factcheck/summarise/model-data", post(summarise_model_data))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Deserialize)]
struct ArticlePayload {
    #[serde(default)]
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct SummarisePayload {
    content: String,
}

fn internal_error(context: &str, e: newslens_common::NewsLensError) -> Response {
    warn!(error = %e, "{context} failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"detail": format!("An error occurred: {e}")})),
    )
        .into_response()
}

async fn predict_statements(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ArticlePayload>,
) -> Response {
    match state.checker.extract_statements(&payload.content).await {
        Ok(statements) => Json(serde_json::json!({"response": statements})).into_response(),
        Err(e) => internal_error("Statement extraction", e),
    }
}

async fn predict_fact_check(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ArticlePayload>,
) -> Response {
    let statements = match state.checker.extract_statements(&payload.content).await {
        Ok(statements) => statements,
        Err(e) => return internal_error("Statement extraction", e),
    };
    if statements.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "No statements found in the payload."})),
        )
            .into_response();
    }

    let findings = match state.checker.fact_check(&statements, &payload.title).await {
        Ok(findings) => findings,
        Err(e) => return internal_error("Fact-check", e),
    };
    if findings.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "No facts found in the payload."})),
        )
            .into_response();
    }

    Json(serde_json::json!({"response": findings})).into_response()
}

async fn summarise(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SummarisePayload>,
) -> Response {
    match state.checker.summarise(&payload.content).await {
        Ok(summary) => Json(serde_json::json!({"response": summary})).into_response(),
        Err(e) => internal_error("Summarisation", e),
    }
}

async fn summarise_model_data(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match state.checker.summarise_model_data(&payload).await {
        Ok(summary) => Json(serde_json::json!({"response": summary})).into_response(),
        Err(e) => internal_error("Data summarisation", e),
    }
}

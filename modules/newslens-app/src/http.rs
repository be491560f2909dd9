use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use futures::Stream;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use newslens_common::{NewsLensError, QueryRequest};

use crate::pipeline::Pipeline;

/// How often the stream endpoint re-reads the record.
const STREAM_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Streams are closed after this long regardless of progress.
const STREAM_TIMEOUT: Duration = Duration::from_secs(240);

pub struct AppState {
    pub pipeline: Pipeline,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/application", get(health))
        .route("/application/check_query", get(health))
        .route("/application/new_query", post(new_query))
        .route("/application/retrieve_exisiting", get(retrieve_existing))
        .route("/application/stream_news", get(stream_news))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn new_query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Response {
    match state
        .pipeline
        .process_url(&payload.url, payload.background)
        .await
    {
        Ok(record) => Json(record).into_response(),
        Err(NewsLensError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "Invalid URL"})),
        )
            .into_response(),
        Err(e) => {
            warn!(url = %payload.url, error = %e, "Query processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"detail": format!("An error occurred: {e}")})),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct NewsIdQuery {
    news_id: String,
}

async fn retrieve_existing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsIdQuery>,
) -> Response {
    match state.pipeline.store().get_news_by_id(&query.news_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "News not found"})),
        )
            .into_response(),
        Err(e) => {
            warn!(news_id = %query.news_id, error = %e, "Record lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"detail": format!("An error occurred: {e}")})),
            )
                .into_response()
        }
    }
}

/// Server-sent events feed for a record under analysis. Polls the store and
/// emits the full record whenever it changes, then a `close` event once the
/// timeout elapses.
async fn stream_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsIdQuery>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        let started = tokio::time::Instant::now();
        let mut last_payload: Option<String> = None;

        loop {
            if started.elapsed() >= STREAM_TIMEOUT {
                info!(news_id = %query.news_id, "Stream timed out");
                yield Ok(Event::default().event("close").data("Stream timeout"));
                break;
            }

            match state.pipeline.store().get_news_by_id(&query.news_id).await {
                Ok(Some(record)) => match serde_json::to_string(&record) {
                    Ok(payload) => {
                        if last_payload.as_deref() != Some(payload.as_str()) {
                            last_payload = Some(payload.clone());
                            yield Ok(Event::default().data(payload));
                        }
                    }
                    Err(e) => {
                        warn!(news_id = %query.news_id, error = %e, "Failed to serialise record");
                    }
                },
                // Unknown ids are not an error: emit nothing until the
                // record shows up, or time out.
                Ok(None) => {}
                Err(e) => {
                    warn!(news_id = %query.news_id, error = %e, "Stream poll failed");
                }
            }

            tokio::time::sleep(STREAM_POLL_INTERVAL).await;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

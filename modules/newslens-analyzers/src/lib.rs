pub mod aggregate;
pub mod chunk;
pub mod emotion;
pub mod propaganda;
pub mod sentiment;
pub mod service;

pub use service::{emotion_router, propaganda_router, sentiment_router, AppState};

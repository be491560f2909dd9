use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsLensError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Downstream service error: {0}")]
    Downstream(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, NewsLensError>;

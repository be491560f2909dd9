use thiserror::Error;

pub type Result<T> = std::result::Result<T, HfError>;

#[derive(Debug, Error)]
pub enum HfError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HfError {
    fn from(err: reqwest::Error) -> Self {
        HfError::Network(err.to_string())
    }
}

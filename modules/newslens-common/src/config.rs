use std::env;

/// Base URLs of every service in the suite, loaded from environment
/// variables with docker-compose defaults.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub store_url: String,
    pub sentiment_url: String,
    pub emotion_url: String,
    pub propaganda_url: String,
    pub scraper_url: String,
    pub factcheck_url: String,
    pub application_url: String,
}

impl ServiceUrls {
    pub fn from_env() -> Self {
        Self {
            store_url: env_or("STORE_URL", "http://localhost:8011"),
            sentiment_url: env_or("SENTIMENT_URL", "http://localhost:8012"),
            emotion_url: env_or("EMOTION_URL", "http://localhost:8013"),
            propaganda_url: env_or("PROPAGANDA_URL", "http://localhost:8014"),
            scraper_url: env_or("SCRAPER_URL", "http://localhost:8015"),
            factcheck_url: env_or("FACTCHECK_URL", "http://localhost:8016"),
            application_url: env_or("APPLICATION_URL", "http://localhost:8010"),
        }
    }
}

/// Read an environment variable, falling back to a default when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a required environment variable.
/// Panics with a clear message if it is missing.
pub fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

/// Parse the bind port for a service, defaulting when unset.
pub fn port_or(key: &str, default: u16) -> u16 {
    match env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}

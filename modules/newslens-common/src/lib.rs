pub mod config;
pub mod error;
pub mod types;

pub use config::{env_or, port_or, required_env, ServiceUrls};
pub use error::NewsLensError;
pub use types::*;

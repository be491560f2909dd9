pub mod checker;
pub mod http;

pub use checker::{FactChecker, DEEPSEEK_MODEL, SONAR_MODEL};
pub use http::{router, AppState};

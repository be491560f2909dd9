pub mod extract;
pub mod http;
pub mod sites;

pub use extract::Extractor;
pub use http::{router, AppState};

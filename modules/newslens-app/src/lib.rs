pub mod clients;
pub mod http;
pub mod pipeline;
pub mod prescrape;
pub mod traits;

pub use http::{router, AppState};
pub use pipeline::Pipeline;

pub mod http;
pub mod store;

pub use http::{router, AppState};
pub use store::NewsStore;

pub mod code_api;
pub mod history_api;
pub mod http;

pub use http::HttpBackend;

// HTTP API surface (axum)
pub mod http;

use axum::{http::StatusCode, routing::get, Router};
use tracing::debug;

async fn ping() -> (StatusCode, &'static str) {
    debug!(route = "/ping", method = "GET", "handle request");
    (StatusCode::OK, "pong")
}

async fn ready() -> (StatusCode, &'static str) {
    debug!(route = "/ready", method = "GET", "handle request");
    (StatusCode::OK, "ready")
}

pub fn create_router() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/ready", get(ready))
}

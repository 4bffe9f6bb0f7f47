use crate::server::Dependencies;
use axum::{debug_handler, extract::State, http::StatusCode, routing::get, Router};
use prometheus_client::encoding::text::encode;
use tracing::{debug, warn};

pub fn create_router(deps: Dependencies) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(deps)
}

#[debug_handler]
async fn metrics(State(state): State<Dependencies>) -> (StatusCode, String) {
    debug!(route = "/metrics", method = "GET", "handle request");

    let mut body = String::new();
    match encode(&mut body, &state.metrics.registry) {
        Err(e) => {
            warn!(error = %e, "fail encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
        Ok(_) => (StatusCode::OK, body),
    }
}

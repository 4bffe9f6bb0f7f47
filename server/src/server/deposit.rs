use axum::{debug_handler, extract::State, routing::post, Json, Router};
use rev_types::{CreateDeposit, DepositRequest, DepositResponse, FromWire};
use tracing::{debug, warn};

use crate::{error::AppError, server::Dependencies};

pub fn create_router(deps: Dependencies) -> Router {
    Router::new()
        .route("/deposit", post(deposit))
        .with_state(deps)
}

#[debug_handler]
async fn deposit(
    State(state): State<Dependencies>,
    Json(payload): Json<CreateDeposit>,
) -> Result<Json<DepositResponse>, AppError> {
    debug!(
        route = "/deposit",
        method = "POST",
        account_id = payload.account_id,
        "handle request"
    );

    let request = DepositRequest::from_wire(payload, &state.codec)?;
    match state.service.deposit(request).await {
        Ok(response) => {
            state.metrics.record_success();
            Ok(Json(response))
        }
        Err(failure) => {
            warn!(
                code = failure.mapping().code(),
                category = %failure.category(),
                "deposit rejected"
            );
            state.metrics.record_failure(failure.category());
            Err(failure.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::server::create_router as app_router;
    use crate::service::tests::{accepted, StubClient};
    use crate::service::PartnerService;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rev_client::DynRevClient;
    use rev_types::{EnumCodec, ErrorMapping, ErrorResponse};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn deps(client: DynRevClient) -> Dependencies {
        Dependencies::new(
            Metrics::new(),
            PartnerService::new(client),
            EnumCodec::default(),
        )
    }

    fn post_deposit(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/deposit")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_deposit_success() {
        let router = app_router(deps(StubClient::ok(accepted())));

        let response = router
            .oneshot(post_deposit(r#"{"account_id":"acc-1","amount":100}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"amount":100,"status":"accepted"}"#
        );
    }

    #[tokio::test]
    async fn test_deposit_business_failure_shape() {
        let router = app_router(deps(StubClient::failing(ErrorMapping::AccountNotFound)));

        let response = router
            .oneshot(post_deposit(r#"{"account_id":"missing","amount":100}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(
            body.starts_with(r#"{"type":"business","error":"account.not_found","timeStamp":"#),
            "{body}"
        );
        let parsed: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert!(!parsed.time_stamp.is_empty());
    }

    #[tokio::test]
    async fn test_deposit_every_failure_is_bad_request() {
        let cases = [
            (ErrorMapping::ValidationInsufficientBalance, "validation", "insufficient.balance"),
            (ErrorMapping::ApiFailed, "system", "service.error"),
        ];
        for (mapping, error_type, code) in cases {
            let router = app_router(deps(StubClient::failing(mapping)));
            let response = router
                .oneshot(post_deposit(r#"{"account_id":"acc-1","amount":5}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let parsed: ErrorResponse =
                serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(parsed.error_type, error_type);
            assert_eq!(parsed.error, code);
        }
    }

    #[tokio::test]
    async fn test_deposit_invalid_currency_skips_partner() {
        let client = StubClient::ok(accepted());
        let router = app_router(deps(client.clone()));

        let response = router
            .oneshot(post_deposit(
                r#"{"account_id":"acc-1","amount":5,"currency":"doge"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_counted_by_category() {
        let deps = deps(StubClient::failing(ErrorMapping::AccountNotFound));
        let metrics = deps.metrics.clone();
        let router = app_router(deps);

        router
            .oneshot(post_deposit(r#"{"account_id":"acc-1","amount":5}"#))
            .await
            .unwrap();

        let mut body = String::new();
        prometheus_client::encoding::text::encode(&mut body, &metrics.registry).unwrap();
        assert!(
            body.contains(r#"rev_partner_failures_total{category="business"} 1"#),
            "{body}"
        );
    }
}

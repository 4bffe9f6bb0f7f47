use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use rev_types::{EnumCodec, ErrorResponse};
use serde_json::json;
use std::{convert::Infallible, net::SocketAddr};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::{Service, ServiceExt};
use tracing::{debug, info, warn};

use crate::{error, metrics as counter, service::PartnerService};

pub mod deposit;
pub mod metrics;
pub mod status;

#[derive(Clone, Debug)]
pub struct Dependencies {
    metrics: counter::Metrics,
    service: PartnerService,
    codec: EnumCodec,
}

impl Dependencies {
    pub fn new(metrics: counter::Metrics, service: PartnerService, codec: EnumCodec) -> Self {
        Self {
            metrics,
            service,
            codec,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Server {
    addr: String,
    deps: Dependencies,
}

impl Server {
    pub fn new(addr: String, deps: Dependencies) -> Self {
        debug!(address = addr, "create new server");
        Self { addr, deps }
    }

    pub async fn serve(&self, shutdown_token: CancellationToken) -> Result<()> {
        let router = create_router(self.deps.clone());
        let mut make_service = router.into_make_service_with_connect_info::<SocketAddr>();
        let listener = TcpListener::bind(self.addr.clone())
            .await
            .with_context(|| format!("fail bind address {}", self.addr))?;
        info!(address = self.addr, "serving on address");

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((socket, remote_addr)) => {
                            let tower_service = unwrap_infallible(make_service.call(remote_addr).await);
                            tokio::spawn(async move {
                                let socket = TokioIo::new(socket);
                                let hyper_service =
                                    hyper::service::service_fn(move |request: Request<Incoming>| {
                                        tower_service.clone().oneshot(request)
                                    });
                                if let Err(err) = server::conn::auto::Builder::new(TokioExecutor::new())
                                    .serve_connection(socket, hyper_service)
                                    .await
                                {
                                    warn!(err = ?err, "fail serve connection")
                                }
                            });
                        }
                        Err(e) => {
                            warn!(error = ?e, "fail accept connection");
                        }
                    }
                }
                _ = shutdown_token.cancelled() => {
                    debug!("shutdown signal received, stopping server");
                    break;
                }
            }
        }
        debug!("server stopped accepting connections");
        Ok(())
    }
}

fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => match err {},
    }
}

pub fn create_router(deps: Dependencies) -> Router {
    status::create_router()
        .merge(metrics::create_router(deps.clone()))
        .merge(deposit::create_router(deps))
}

impl IntoResponse for error::AppError {
    fn into_response(self) -> Response {
        match self {
            error::AppError::Partner(failure) => {
                let body = ErrorResponse::from(&failure);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            error::AppError::InvalidRequest(e) => {
                let body = Json(json!({
                    "error": e.to_string(),
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
        }
    }
}

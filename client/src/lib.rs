mod classifier;
mod decoder;
mod error;
mod json;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use rev_types::{ClassifiedFailure, DepositRequest, DepositResponse};
use std::sync::Arc;
use tracing::{debug, error};

pub use classifier::RevErrorHandler;
pub use decoder::{
    ClientErrorDecoder, DynErrorHandler, ErrorHandler, PartnerResponse, RequestTemplate,
    ResponseReader,
};
pub use error::{BuildError, DecodeError, Result};
pub use json::JsonDecoder;

pub const DEPOSIT_METHOD_KEY: &str = "RevClient#deposit(DepositRequest)";

/// Operations offered by the Rev partner.
#[async_trait]
pub trait RevClient: Send + Sync {
    async fn deposit(&self, request: &DepositRequest) -> Result<DepositResponse>;
}

pub type DynRevClient = Arc<dyn RevClient>;

#[derive(Clone, Debug)]
pub struct HttpRevClient {
    http: reqwest::Client,
    base_url: String,
    json: JsonDecoder,
    errors: ClientErrorDecoder,
}

impl HttpRevClient {
    pub fn new(
        base_url: String,
        token: &str,
        json: JsonDecoder,
        errors: ClientErrorDecoder,
    ) -> std::result::Result<Self, BuildError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        debug!(base_url = %base_url, "create rev partner client");
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            json,
            errors,
        })
    }
}

#[async_trait]
impl RevClient for HttpRevClient {
    async fn deposit(&self, request: &DepositRequest) -> Result<DepositResponse> {
        let url = format!("{}/deposit", self.base_url);
        let body = serde_json::to_string(request).map_err(|e| {
            error!(error = %e, "fail encode deposit request");
            ClassifiedFailure::system()
        })?;
        let template = RequestTemplate {
            method: Method::POST,
            url: url.clone(),
            body: body.clone(),
        };

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(method_key = DEPOSIT_METHOD_KEY, url = %url, error = %e, "partner request failed");
                ClassifiedFailure::system()
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            error!(method_key = DEPOSIT_METHOD_KEY, status = %status, error = %e, "fail read partner response");
            ClassifiedFailure::system()
        })?;

        if !status.is_success() {
            let response = PartnerResponse {
                status,
                body: bytes,
                request: template,
            };
            return Err(self.errors.decode(DEPOSIT_METHOD_KEY, &response));
        }

        self.json.read::<DepositResponse>(&bytes).map_err(|e| {
            error!(method_key = DEPOSIT_METHOD_KEY, status = %status, error = %e, "fail decode deposit response");
            ClassifiedFailure::system()
        })
    }
}

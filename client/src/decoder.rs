use bytes::Bytes;
use reqwest::{Method, StatusCode};
use rev_types::{ClassifiedFailure, FromWire};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::DecodeError;
use crate::json::JsonDecoder;

/// Outbound request as it was sent, kept for diagnostics.
#[derive(Clone, Debug)]
pub struct RequestTemplate {
    pub method: Method,
    pub url: String,
    pub body: String,
}

impl fmt::Display for RequestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.url, self.body)
    }
}

/// A partner response outside the 2xx range.
#[derive(Clone, Debug)]
pub struct PartnerResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub request: RequestTemplate,
}

/// Lazy typed view of a response body. Nothing is parsed until `read`.
pub struct ResponseReader<'a> {
    decoder: &'a JsonDecoder,
    body: &'a [u8],
}

impl<'a> ResponseReader<'a> {
    pub fn new(decoder: &'a JsonDecoder, body: &'a [u8]) -> Self {
        Self { decoder, body }
    }

    pub fn read<T: FromWire>(&self) -> Result<T, DecodeError> {
        self.decoder.read(self.body)
    }
}

/// Turns a partner error response into a classified failure.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(
        &self,
        method_key: &str,
        status: StatusCode,
        reader: &ResponseReader<'_>,
    ) -> Option<ClassifiedFailure>;
}

pub type DynErrorHandler = Arc<dyn ErrorHandler>;

#[derive(Clone)]
pub struct ClientErrorDecoder {
    handler: DynErrorHandler,
    json: JsonDecoder,
}

impl ClientErrorDecoder {
    pub fn new(handler: DynErrorHandler, json: JsonDecoder) -> Self {
        Self { handler, json }
    }

    pub fn decode(&self, method_key: &str, response: &PartnerResponse) -> ClassifiedFailure {
        error!(
            method_key,
            status = %response.status,
            "rest call fail on partner method"
        );
        info!(request = %response.request, "partner request");

        let reader = ResponseReader::new(&self.json, &response.body);
        self.handler
            .handle_error(method_key, response.status, &reader)
            .unwrap_or_else(ClassifiedFailure::system)
    }
}

impl fmt::Debug for ClientErrorDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientErrorDecoder")
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

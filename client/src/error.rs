use reqwest::header::InvalidHeaderValue;
use rev_types::{ClassifiedFailure, CodecError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to parse response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("invalid bearer token: {0}")]
    Token(#[from] InvalidHeaderValue),

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClassifiedFailure>;

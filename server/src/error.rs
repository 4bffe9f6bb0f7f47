use rev_types::{ClassifiedFailure, CodecError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("partner failure: {0}")]
    Partner(#[from] ClassifiedFailure),
    #[error("invalid deposit request: {0}")]
    InvalidRequest(#[from] CodecError),
}

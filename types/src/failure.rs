use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::Display;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Display, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCategory {
    Business,
    Validation,
    System,
}

/// Stable internal error codes surfaced to callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorMapping {
    AccountNotFound,
    ValidationInsufficientBalance,
    ApiFailed,
}

impl ErrorMapping {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorMapping::AccountNotFound => "account.not_found",
            ErrorMapping::ValidationInsufficientBalance => "insufficient.balance",
            ErrorMapping::ApiFailed => "service.error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorMapping::AccountNotFound => "Account not found",
            ErrorMapping::ValidationInsufficientBalance => "Insufficient balance",
            ErrorMapping::ApiFailed => "Rev Service API failed",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorMapping::AccountNotFound => ErrorCategory::Business,
            ErrorMapping::ValidationInsufficientBalance => ErrorCategory::Validation,
            ErrorMapping::ApiFailed => ErrorCategory::System,
        }
    }
}

/// Partner error constants with a dedicated mapping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusReason {
    AccountNotFound,
    ValidationInsufficientBalance,
}

impl StatusReason {
    pub fn mapping(&self) -> ErrorMapping {
        match self {
            StatusReason::AccountNotFound => ErrorMapping::AccountNotFound,
            StatusReason::ValidationInsufficientBalance => {
                ErrorMapping::ValidationInsufficientBalance
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown status reason '{0}'")]
pub struct UnknownReason(pub String);

impl FromStr for StatusReason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account_not_found" => Ok(Self::AccountNotFound),
            "insufficient_balance" => Ok(Self::ValidationInsufficientBalance),
            _ => Err(UnknownReason(s.to_string())),
        }
    }
}

/// A partner failure reduced to an internal code and category.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .mapping.description())]
pub struct ClassifiedFailure {
    mapping: ErrorMapping,
    category: ErrorCategory,
    timestamp: DateTime<Utc>,
}

impl ClassifiedFailure {
    pub fn new(mapping: ErrorMapping) -> Self {
        Self {
            mapping,
            category: mapping.category(),
            timestamp: Utc::now(),
        }
    }

    pub fn system() -> Self {
        Self::new(ErrorMapping::ApiFailed)
    }

    pub fn mapping(&self) -> ErrorMapping {
        self.mapping
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Body returned to inbound callers for a classified failure.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

impl From<&ClassifiedFailure> for ErrorResponse {
    fn from(failure: &ClassifiedFailure) -> Self {
        Self {
            error_type: failure.category().to_string(),
            error: failure.mapping().code().to_string(),
            time_stamp: failure
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

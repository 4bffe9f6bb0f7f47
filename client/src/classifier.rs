use reqwest::StatusCode;
use rev_types::{ClassifiedFailure, ErrorMapping, PartnerErrorPayload, StatusReason};
use tracing::error;

use crate::decoder::{ErrorHandler, ResponseReader};

/// Classifies Rev partner error bodies by their `errorConstant`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RevErrorHandler;

impl RevErrorHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(
        &self,
        method_key: &str,
        status: StatusCode,
        reader: &ResponseReader<'_>,
    ) -> ClassifiedFailure {
        let mapping = match reader.read::<PartnerErrorPayload>() {
            Ok(payload) => {
                let error_constant = payload.error_constant.as_deref().unwrap_or_default();
                error!(
                    method_key,
                    error_constant,
                    message = payload.message.as_deref().unwrap_or_default(),
                    "partner method returned error"
                );
                error_constant
                    .parse::<StatusReason>()
                    .map(|reason| reason.mapping())
                    .unwrap_or(ErrorMapping::ApiFailed)
            }
            Err(e) => {
                error!(
                    method_key,
                    status = %status,
                    error = %e,
                    "fail decode partner error body"
                );
                ErrorMapping::ApiFailed
            }
        };

        let failure = ClassifiedFailure::new(mapping);
        error!(
            code = mapping.code(),
            description = mapping.description(),
            category = %failure.category(),
            "error received from rev server"
        );
        failure
    }
}

impl ErrorHandler for RevErrorHandler {
    fn handle_error(
        &self,
        method_key: &str,
        status: StatusCode,
        reader: &ResponseReader<'_>,
    ) -> Option<ClassifiedFailure> {
        Some(self.classify(method_key, status, reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonDecoder;
    use rev_types::ErrorCategory;

    fn classify(status: u16, body: &str) -> ClassifiedFailure {
        let json = JsonDecoder::default();
        let reader = ResponseReader::new(&json, body.as_bytes());
        let status = StatusCode::from_u16(status).unwrap();
        RevErrorHandler::new().classify("RevClient#deposit", status, &reader)
    }

    #[test]
    fn test_account_not_found_is_business() {
        let failure = classify(
            404,
            r#"{"code":404,"errorConstant":"account_not_found","message":"no such account"}"#,
        );
        assert_eq!(failure.category(), ErrorCategory::Business);
        assert_eq!(failure.mapping().code(), "account.not_found");
    }

    #[test]
    fn test_insufficient_balance_is_validation() {
        let failure = classify(409, r#"{"code":409,"errorConstant":"insufficient_balance"}"#);
        assert_eq!(failure.category(), ErrorCategory::Validation);
        assert_eq!(failure.mapping().code(), "insufficient.balance");
    }

    #[test]
    fn test_unrecognized_constants_are_system() {
        let bodies = [
            r#"{"code":500,"errorConstant":"timeout_upstream"}"#,
            r#"{"code":500,"errorConstant":""}"#,
            r#"{"code":500,"errorConstant":null}"#,
            r#"{"code":500}"#,
            r#"{"code":404,"errorConstant":"ACCOUNT_NOT_FOUND"}"#,
            r#"{"code":404,"errorConstant":"account_not_found_v2"}"#,
            r#"{"code":409,"errorConstant":"Insufficient_Balance"}"#,
        ];
        for body in bodies {
            let failure = classify(500, body);
            assert_eq!(failure.category(), ErrorCategory::System, "{body}");
            assert_eq!(failure.mapping().code(), "service.error", "{body}");
        }
    }

    #[test]
    fn test_undecodable_body_is_system() {
        for body in ["", "<html>bad gateway</html>", r#"{"code":"x"}"#, "[]"] {
            let failure = classify(502, body);
            assert_eq!(failure.mapping(), ErrorMapping::ApiFailed, "{body}");
        }
    }

    #[test]
    fn test_status_does_not_drive_classification() {
        let failure = classify(500, r#"{"code":500,"errorConstant":"account_not_found"}"#);
        assert_eq!(failure.category(), ErrorCategory::Business);
    }
}

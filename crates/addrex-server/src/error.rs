//! Error handling for the REST API server.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use addrex_core::error::{AddrexError, ErrorCode};

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "ANNOTATOR_UNAVAILABLE", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "ANNOTATOR_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from addrex-core errors
impl From<AddrexError> for ApiError {
    fn from(err: AddrexError) -> Self {
        let code = err.code().as_str();

        match err {
            AddrexError::Configuration(msg) => {
                tracing::error!(error = %msg, "Annotator is not available");
                ApiError::unavailable(msg).with_details(serde_json::json!({ "code": code }))
            }
            AddrexError::UnsupportedProvider { provider } => {
                ApiError::unavailable(format!("Unsupported annotator provider: {}", provider))
            }
            AddrexError::Validation { message, field, .. } => {
                let api = ApiError::validation(message);
                match field {
                    Some(field) => api.with_details(serde_json::json!({ "field": field, "code": code })),
                    None => api.with_details(serde_json::json!({ "code": code })),
                }
            }
            AddrexError::Annotator { message, .. } => {
                ApiError::bad_gateway(message).with_details(serde_json::json!({ "code": code }))
            }
            AddrexError::Network { message, .. } => {
                ApiError::bad_gateway(format!("Network error: {}", message))
                    .with_details(serde_json::json!({ "code": code }))
            }
            AddrexError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
        }
    }
}

// Body rejections: malformed JSON is a 400, a well-formed body with the
// wrong shape (unknown or mistyped fields) is a validation error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let message = e.body_text();
                let code = if message.contains("unknown field") {
                    ErrorCode::ValUnknownField
                } else {
                    ErrorCode::ValInvalidInput
                };
                ApiError::validation(message)
                    .with_details(serde_json::json!({ "code": code.as_str() }))
            }
            other => ApiError::new(other.status(), "BAD_REQUEST", other.body_text()),
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_maps_to_unavailable() {
        let api: ApiError = AddrexError::Configuration("model missing".to_string()).into();
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api.message, "model missing");
    }

    #[test]
    fn test_validation_carries_field() {
        let api: ApiError = AddrexError::too_long("text", 5000).into();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        let details = api.details.unwrap();
        assert_eq!(details["field"], "text");
        assert_eq!(details["code"], "VAL_002");
    }

    #[test]
    fn test_annotator_failure_is_bad_gateway() {
        let api: ApiError = AddrexError::annotator("backend down").into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_io_error_is_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let api: ApiError = AddrexError::from(io).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, "INTERNAL_ERROR");
        assert!(api.message.contains("denied"));
    }

    #[test]
    fn test_remote_timeout_is_bad_gateway() {
        let api: ApiError = AddrexError::from_http_status(504, "slow").into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.details.unwrap()["code"], "NET_001");
    }
}

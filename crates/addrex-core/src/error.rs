//! Error types for addrex operations.
//!
//! Errors carry a structured [`ErrorCode`] so the HTTP layer and remote
//! annotator clients can handle them programmatically.

use thiserror::Error;

/// Result type alias for addrex operations.
pub type AddrexResult<T> = Result<T, AddrexError>;

/// Main error type for all addrex operations.
#[derive(Error, Debug)]
pub enum AddrexError {
    /// Configuration error, including an annotator model that cannot be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        field: Option<String>,
    },

    /// The annotator failed while processing text.
    #[error("Annotator error: {message}")]
    Annotator {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error talking to a remote annotator.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Annotator provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalid,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValTooLong,
    ValTooShort,
    ValUnknownField,

    // Annotator (ANN_xxx)
    AnnFailed,
    AnnInvalidResponse,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValTooLong => "VAL_002",
            ErrorCode::ValTooShort => "VAL_003",
            ErrorCode::ValUnknownField => "VAL_004",
            ErrorCode::AnnFailed => "ANN_001",
            ErrorCode::AnnInvalidResponse => "ANN_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl AddrexError {
    /// Create a validation error for a field that exceeds its maximum length.
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("'{}' must be at most {} characters", field, max),
            code: ErrorCode::ValTooLong,
            field: Some(field),
        }
    }

    /// Create a validation error for a field below its minimum length.
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("'{}' must be at least {} characters", field, min),
            code: ErrorCode::ValTooShort,
            field: Some(field),
        }
    }

    /// Create the error raised when an annotator model cannot be provisioned.
    pub fn model_missing(model: &str, location: &str, hint: &str) -> Self {
        Self::Configuration(format!(
            "Annotator model '{}' not found at {}. {}",
            model, location, hint
        ))
    }

    /// Create an annotator error.
    pub fn annotator(message: impl Into<String>) -> Self {
        Self::Annotator {
            message: message.into(),
            code: ErrorCode::AnnFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Validation { code, .. } => *code,
            Self::Annotator { code, .. } => *code,
            Self::Network { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => {
                Some("Check ADDREX_ANNOTATOR_* settings and that the model is provisioned")
            }
            Self::Network { .. } => Some("Check that the annotator service is reachable"),
            Self::Annotator { .. } => Some("Check the annotator backend logs"),
            _ => None,
        }
    }

    /// Convert from an HTTP status returned by a remote annotator.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 | 422 => Self::Annotator {
                message: format!("annotator rejected request: {}", body),
                code: ErrorCode::AnnInvalidResponse,
                source: None,
            },
            404 => Self::Configuration(format!("annotator endpoint or model not found: {}", body)),
            408 | 504 => Self::Network {
                message: body.to_string(),
                code: ErrorCode::NetTimeout,
                source: None,
            },
            _ => Self::Annotator {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::AnnFailed,
                source: None,
            },
        }
    }
}

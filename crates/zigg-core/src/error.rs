//! Error types module
//!
//! Every failure of the console workflows is one `ConsoleError` variant. The
//! variants mirror the stages of a media workflow: form validation happens
//! before any I/O, decoding and encoding happen locally, and `Api`/`Upload`
//! carry the status the backend or the storage endpoint answered with.
//!
//! Nothing here retries. Errors surface once, as a blocking message to the
//! operator, and the workflow is abandoned.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for operator-recoverable issues like a bad file
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error is presented to the operator
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_ERROR")
    fn error_code(&self) -> &'static str;

    /// Message shown in the blocking alert
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// HTTP status involved, if the error came off the wire
    fn http_status_code(&self) -> Option<u16>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    /// Non-2xx from the grant or entity endpoints. `message` is the response
    /// body passed through untouched; `status` is absent when no response was
    /// received at all.
    #[error("API error ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "no response".to_string()))]
    Api { status: Option<u16>, message: String },

    /// Non-2xx from a presigned upload URL.
    #[error("Upload failed with status {status}")]
    Upload { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error with source")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::Validation(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ConsoleError::Api {
            status: Some(status),
            message: message.into(),
        }
    }

    /// True when the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ConsoleError::Unauthorized(_) | ConsoleError::Api { status: Some(401), .. }
        )
    }
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        ConsoleError::Internal {
            message: format!("IO error: {}", err),
            source: err.into(),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ConsoleError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConsoleError::Validation(crate::validation::describe(&err))
    }
}

impl ErrorMetadata for ConsoleError {
    fn error_code(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "VALIDATION_ERROR",
            ConsoleError::Decode(_) => "DECODE_ERROR",
            ConsoleError::Encode(_) => "ENCODE_ERROR",
            ConsoleError::Api { .. } => "API_ERROR",
            ConsoleError::Upload { .. } => "UPLOAD_ERROR",
            ConsoleError::Transport(_) => "TRANSPORT_ERROR",
            ConsoleError::Unauthorized(_) => "UNAUTHORIZED",
            ConsoleError::Config(_) => "CONFIG_ERROR",
            ConsoleError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            ConsoleError::Validation(msg) => msg.clone(),
            ConsoleError::Decode(msg) => format!("Could not read the media file: {}", msg),
            ConsoleError::Encode(msg) => format!("Could not re-encode the image: {}", msg),
            ConsoleError::Api { message, .. } if !message.is_empty() => message.clone(),
            ConsoleError::Api { .. } => "An unknown error occurred.".to_string(),
            ConsoleError::Upload { status } => format!("Presigned upload failed: {}", status),
            ConsoleError::Transport(msg) => msg.clone(),
            ConsoleError::Unauthorized(_) => "Session expired. Please log in again.".to_string(),
            ConsoleError::Config(msg) => msg.clone(),
            ConsoleError::Internal { message, .. } => message.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ConsoleError::Validation(_) | ConsoleError::Unauthorized(_) => LogLevel::Debug,
            ConsoleError::Decode(_) | ConsoleError::Api { .. } | ConsoleError::Config(_) => {
                LogLevel::Warn
            }
            ConsoleError::Encode(_)
            | ConsoleError::Upload { .. }
            | ConsoleError::Transport(_)
            | ConsoleError::Internal { .. } => LogLevel::Error,
        }
    }

    fn http_status_code(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } => *status,
            ConsoleError::Upload { status } => Some(*status),
            ConsoleError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_passes_backend_message_through() {
        let err = ConsoleError::api(409, "audition already closed");
        assert_eq!(err.client_message(), "audition already closed");
        assert_eq!(err.http_status_code(), Some(409));
        assert_eq!(err.error_code(), "API_ERROR");
        assert_eq!(
            err.to_string(),
            "API error (409): audition already closed"
        );
    }

    #[test]
    fn api_error_without_response_has_fallback_message() {
        let err = ConsoleError::Api {
            status: None,
            message: String::new(),
        };
        assert_eq!(err.client_message(), "An unknown error occurred.");
        assert_eq!(err.http_status_code(), None);
        assert!(err.to_string().contains("no response"));
    }

    #[test]
    fn upload_error_carries_transport_status() {
        let err = ConsoleError::Upload { status: 403 };
        assert_eq!(err.http_status_code(), Some(403));
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(err.client_message().contains("403"));
    }

    #[test]
    fn unauthorized_detection() {
        assert!(ConsoleError::api(401, "expired").is_unauthorized());
        assert!(ConsoleError::Unauthorized("no token".into()).is_unauthorized());
        assert!(!ConsoleError::api(403, "forbidden").is_unauthorized());
        assert!(!ConsoleError::Upload { status: 401 }.is_unauthorized());
    }

    #[test]
    fn validation_is_logged_at_debug() {
        let err = ConsoleError::validation("Title is required");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(err.client_message(), "Title is required");
    }
}

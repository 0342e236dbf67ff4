//! Error types for adlibs.
//!
//! This module defines all error types used throughout the adlibs crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// The main error type for adlibs operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Data Errors ===
    /// The record buffer holds no campaign data yet.
    #[error("no campaign data available yet")]
    NoData,

    /// An unknown theme name was requested.
    #[error("unknown theme '{0}' (expected 'light' or 'dark')")]
    UnknownTheme(String),

    // === Report Errors ===
    /// Rendering the PDF report failed.
    #[error("failed to render report: {0}")]
    Report(String),

    // === Server Errors ===
    /// Failed to bind the HTTP listener.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that couldn't be bound.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for adlibs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new report rendering error.
    #[must_use]
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error indicates an empty record buffer.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// The HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoData => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnknownTheme(_) | Self::ConfigValidation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && !self.is_no_data() {
            tracing::error!("request failed: {self}");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoData;
        assert_eq!(err.to_string(), "no campaign data available yet");

        let err = Error::report("font missing");
        assert_eq!(err.to_string(), "failed to render report: font missing");
    }

    #[test]
    fn test_error_is_no_data() {
        assert!(Error::NoData.is_no_data());
        assert!(!Error::internal("test").is_no_data());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_unknown_theme_display() {
        let err = Error::UnknownTheme("sepia".to_string());
        let msg = err.to_string();
        assert!(msg.contains("sepia"));
        assert!(msg.contains("light"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::NoData.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            Error::UnknownTheme("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::ConfigValidation {
                message: "x".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::report("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = Error::NoData.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid interval".to_string(),
        };
        assert!(err.to_string().contains("invalid interval"));
    }

    #[test]
    fn test_bind_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = Error::Bind {
            addr: "127.0.0.1:8050".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:8050"));
        assert!(msg.contains("address in use"));
    }

    #[test]
    fn test_file_write_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::FileWrite {
            path: PathBuf::from("/root/report.pdf"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/report.pdf"));
    }
}

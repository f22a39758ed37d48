//! Error types for the document Q&A system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document Q&A errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File extension outside the accepted set
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// A file could not be parsed
    #[error("Failed to extract '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// No files or blank question
    #[error("{0}")]
    EmptyInput(String),

    /// Embedding/generation endpoint down at construction time
    #[error("Model service unreachable: {0}")]
    ServiceUnreachable(String),

    /// Index backend failure
    #[error("Index storage error: {0}")]
    Storage(String),

    /// LLM call error
    #[error("Model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an empty-input error
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::UnsupportedType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::Extraction { filename, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "extraction_error",
                format!("Failed to extract '{}': {}", filename, message),
            ),
            Error::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "empty_input", msg.clone()),
            Error::ServiceUnreachable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unreachable",
                msg.clone(),
            ),
            Error::Storage(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg.clone())
            }
            Error::Model(msg) => (StatusCode::SERVICE_UNAVAILABLE, "model_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

//! Error types for the node core.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors that can occur in node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The info file could not be read.
    #[error("failed to read info file '{}': {source}", path.display())]
    InfoRead {
        /// Path of the info file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The info file is not a valid info record.
    #[error("failed to parse info file '{}': {source}", path.display())]
    InfoParse {
        /// Path of the info file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The info record could not be encoded.
    #[error("failed to encode info record: {0}")]
    InfoEncode(#[source] serde_json::Error),

    /// The info file could not be written.
    #[error("failed to write info file '{}': {source}", path.display())]
    InfoWrite {
        /// Path of the info file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The info record carries no start time.
    #[error("info record has no start time")]
    MissingStart,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to bind the listener.
    #[error("failed to bind to {addr}: {source}")]
    BindFailed {
        /// Address that was requested.
        addr: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        error!(error = %self, "node info request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Failed to read node info",
            }),
        )
            .into_response()
    }
}

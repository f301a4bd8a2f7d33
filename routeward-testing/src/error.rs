use routeward::{HttpMethod, RoutewardError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an audit run.
///
/// Status mismatches are not errors: they are recorded as failed outcomes in
/// the [`AuditReport`](crate::AuditReport).
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("No controller root configured")]
    MissingControllerRoot,

    #[error("Controller root {} is not a readable directory: {reason}", path.display())]
    UnreadableRoot { path: PathBuf, reason: String },

    #[error("Cannot resolve controller {identifier} (from {path}): {source}")]
    UnresolvedController {
        identifier: String,
        path: String,
        #[source]
        source: RoutewardError,
    },

    #[error("Request {method} {path} failed: {source}")]
    Client {
        method: HttpMethod,
        path: String,
        #[source]
        source: ClientError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

use thiserror::Error;

/// Error taxonomy for the curator client. Every failure is eventually
/// converted into a notice or an inline transcript entry by the callers;
/// nothing here is fatal to the session.
#[derive(Debug, Error)]
pub enum CuratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/transport failure (connect, timeout, broken body).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status where the body carried a structured
    /// `{ "message": ... }` payload.
    #[error("Server error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Non-success HTTP status with an unstructured body.
    #[error("Unexpected HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response decoded, but not into the shape an endpoint promises.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// Terminal failure reported by the backend for an async task.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CuratorError>;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphitiError {
    /// The request body could not be encoded; nothing was sent.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The HTTP client, base URL, path or method could not form a valid request.
    #[error("Failed to build request: {0}")]
    RequestConstruction(String),

    /// The round trip itself failed (DNS, refused connection, timeout, ...).
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status outside 2xx. `body` is the raw response text.
    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GraphitiError {
    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GraphitiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by status and decode errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            GraphitiError::Status { body, .. } | GraphitiError::Deserialization { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GraphitiError::Transport(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, GraphitiError>;

//! Planner client error types.

use crate::domain::DomainError;

/// Failure to decode one unit of a response (a connection, a section, a
/// common block).
///
/// Decoding is scoped: a `DecodeError` on one connection drops that
/// connection only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The record didn't have the expected shape (missing key, wrong type).
    #[error("malformed {what}: {message}")]
    Malformed { what: &'static str, message: String },

    /// Section mode tag not in the supported set.
    #[error("unknown section mode: {0}")]
    UnknownMode(String),

    /// A mode-specific payload the mode requires is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An index points outside the table it refers to.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl DecodeError {
    pub(crate) fn malformed(what: &'static str, err: serde_json::Error) -> Self {
        DecodeError::Malformed {
            what,
            message: err.to_string(),
        }
    }
}

/// Errors from talking to the planner.
#[derive(Debug, thiserror::Error)]
pub enum HafasError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body wasn't the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rejected credentials
    #[error("unauthorized (check the client aid)")]
    Unauthorized,

    #[error("rate limited by the planner")]
    RateLimited,

    /// A service request came back with an error code
    #[error("{method} failed: {code}")]
    Service { method: String, code: String },

    /// The envelope held no result for the requested method
    #[error("no {0} result in response")]
    MissingResult(String),

    /// A response-level block couldn't be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

//! Failure taxonomy for API dispatch.
//!
//! Every failure carries enough structure for callers to branch on it
//! directly: HTTP failures keep their numeric status, and an unreachable
//! backend stays distinguishable from parse and status failures.

use std::time::Duration;

use thiserror::Error;

use crate::session::SessionError;

/// Message shown when the backend cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Cannot connect to server. Please check:\n\
     1. Backend is running\n\
     2. CORS is configured\n\
     3. Correct API URL";

/// Message used when a successful response body is not valid JSON.
pub const PARSE_MESSAGE: &str = "failed to parse response";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the backend (connection refused, DNS, etc.).
    #[error("{}", UNREACHABLE_MESSAGE)]
    NetworkUnreachable {
        /// Underlying transport error text.
        cause: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx body could not be decoded.
    #[error("{}", PARSE_MESSAGE)]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// The per-request deadline elapsed before the call settled.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The call succeeded without content where a value was required.
    #[error("server returned no content for {endpoint}")]
    EmptyBody { endpoint: String },

    /// Transport failure after the connection was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status code, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::NetworkUnreachable { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

//! Error types

/// JSON-RPC errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection or request could not complete
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Request exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Transient failures persisted through every retry
    #[error("Unavailable after {attempts} attempts: {last}")]
    Unavailable {
        /// Attempts made
        attempts: u32,
        /// Last failure
        last: String,
    },

    /// Return data does not match the expected ABI
    #[error("ABI decode error: {0}")]
    Abi(String),

    /// Response body is not valid JSON-RPC
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client could not be built
    #[error("Config error: {0}")]
    Config(String),
}

/// JSON-RPC code for rate limiting ("limit exceeded")
const RATE_LIMITED: i64 = -32005;

impl Error {
    /// Check if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout(_) => true,
            Error::HttpStatus(status) => *status >= 500 || *status == 429,
            Error::Rpc { code, .. } => *code == RATE_LIMITED,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else if let Some(status) = e.status() {
            Error::HttpStatus(status.as_u16())
        } else if e.is_decode() {
            Error::Transport(format!("body decode: {}", e))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl From<Error> for unruggable_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Abi(_) | Error::Json(_) => unruggable_core::Error::InvalidResponse(e.to_string()),
            other => unruggable_core::Error::RegistryUnavailable(other.to_string()),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

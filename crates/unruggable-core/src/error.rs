//! Error types for unruggable lookups
//!
//! Every failure a lookup can produce is one of these variants, and callers
//! are expected to tell them apart: bad input is never retried, a missing
//! resolver is a negative answer, and an unavailable registry is transient.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// DNS wire encoding is not well formed
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Dotted name cannot be encoded
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Address is not 20 bytes of hex
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Registry snapshot file cannot be read or parsed
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// No suffix of the name, including the root, has a registered entry
    #[error("No resolver found: {0}")]
    NoResolverFound(String),

    /// Registry could not be queried (timeout, transport failure)
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Registry answered with data that cannot be decoded
    #[error("Invalid registry response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Check if the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RegistryUnavailable(_))
    }

    /// Check if the error was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    /// Get error category for logging and exit codes
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MalformedEncoding(_)
            | Error::InvalidName(_)
            | Error::InvalidAddress(_)
            | Error::InvalidSnapshot(_) => ErrorCategory::Input,
            Error::NoResolverFound(_) => ErrorCategory::NotFound,
            Error::RegistryUnavailable(_) => ErrorCategory::Unavailable,
            Error::InvalidResponse(_) => ErrorCategory::Registry,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input, not retried
    Input,
    /// Valid input without a match
    NotFound,
    /// Transient collaborator failure
    Unavailable,
    /// Collaborator misbehaved
    Registry,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "Input"),
            ErrorCategory::NotFound => write!(f, "NotFound"),
            ErrorCategory::Unavailable => write!(f, "Unavailable"),
            ErrorCategory::Registry => write!(f, "Registry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_detection() {
        assert!(Error::RegistryUnavailable("timeout".to_string()).is_retryable());
        assert!(!Error::NoResolverFound("a.eth".to_string()).is_retryable());
        assert!(!Error::MalformedEncoding("test".to_string()).is_retryable());
        assert!(!Error::InvalidResponse("test".to_string()).is_retryable());
        assert!(!Error::InvalidSnapshot("missing".to_string()).is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::MalformedEncoding("test".to_string()).category(),
            ErrorCategory::Input
        );
        assert_eq!(
            Error::InvalidName("test".to_string()).category(),
            ErrorCategory::Input
        );
        assert_eq!(
            Error::NoResolverFound("test".to_string()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            Error::RegistryUnavailable("test".to_string()).category(),
            ErrorCategory::Unavailable
        );
        assert_eq!(
            Error::InvalidResponse("test".to_string()).category(),
            ErrorCategory::Registry
        );
        assert!(Error::InvalidAddress("0x".to_string()).is_input_error());
        assert!(Error::InvalidSnapshot("test".to_string()).is_input_error());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Input.to_string(), "Input");
        assert_eq!(ErrorCategory::NotFound.to_string(), "NotFound");
        assert_eq!(ErrorCategory::Unavailable.to_string(), "Unavailable");
    }

    #[test]
    fn test_error_messages() {
        let err = Error::NoResolverFound("raffy.eth".to_string());
        assert_eq!(err.to_string(), "No resolver found: raffy.eth");
    }
}

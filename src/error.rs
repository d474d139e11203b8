//! Error types for ledger operations.
//!
//! Every failure an operation can produce is reported as a [`LedgerError`]
//! value. None of them are fatal to the host process: a caller running a
//! batch of updates can log one failure and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Rejected input (empty description, unknown status token, ...)
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// No entry carries the requested identifier
    #[error("No entry with ID {id}")]
    NotFound { id: String },

    /// A line mentions the identifier but is not a well-formed entry line
    #[error("Malformed entry line {line} for ID {id}")]
    MalformedDocument { id: String, line: usize },

    // =========================================================================
    // IO Errors
    // =========================================================================
    /// Ledger file does not exist
    #[error("Ledger file not found: {path}")]
    MissingDocument { path: PathBuf },

    /// Reading or writing a specific file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Bare IO error wrapper
    #[error(transparent)]
    BareIo(#[from] std::io::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedgerError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a malformed-document error for a 1-based line number
    pub fn malformed(id: impl Into<String>, line: usize) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            line,
        }
    }

    /// Create an IO error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if the identifier could not be resolved to an entry
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MalformedDocument { .. })
    }

    /// Check if this is an IO-level failure
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::MissingDocument { .. } | Self::Io { .. } | Self::BareIo(_)
        )
    }

    /// Check if a batch caller can move on to its next operation.
    ///
    /// Only IO and configuration problems affect every later operation too.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::MalformedDocument { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            Self::NotFound { .. } => 3,
            Self::MalformedDocument { .. } => 4,
            Self::MissingDocument { .. } | Self::Io { .. } | Self::BareIo(_) => 5,
            Self::Config { .. } => 7,
            Self::Other(_) => 1,
        }
    }
}

/// Type alias for ledger results
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Extension trait for attaching a path to IO results
pub trait IoResultExt<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| LedgerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::not_found("abc-123");
        assert_eq!(err.to_string(), "No entry with ID abc-123");

        let err = LedgerError::malformed("abc-123", 12);
        assert!(err.to_string().contains("line 12"));
    }

    #[test]
    fn test_validation_display() {
        let err = LedgerError::validation("status", "expected 'open' or 'closed'");
        assert_eq!(
            err.to_string(),
            "Invalid status: expected 'open' or 'closed'"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(LedgerError::not_found("x").is_not_found());
        assert!(LedgerError::malformed("x", 1).is_not_found());
        assert!(!LedgerError::validation("a", "b").is_not_found());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(LedgerError::not_found("x").is_recoverable());
        assert!(LedgerError::validation("a", "b").is_recoverable());
        assert!(!LedgerError::MissingDocument {
            path: PathBuf::from("TODO.md")
        }
        .is_recoverable());
        assert!(!LedgerError::config("bad").is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(LedgerError::validation("a", "b").exit_code(), 2);
        assert_eq!(LedgerError::not_found("x").exit_code(), 3);
        assert_eq!(LedgerError::malformed("x", 1).exit_code(), 4);
        assert_eq!(
            LedgerError::MissingDocument {
                path: PathBuf::from("TODO.md")
            }
            .exit_code(),
            5
        );
        assert_eq!(LedgerError::config("test").exit_code(), 7);
    }

    #[test]
    fn test_config_with_path() {
        let path = PathBuf::from("/test/todo-ledger.toml");
        let err = LedgerError::config_with_path("failed to parse", path.clone());
        if let LedgerError::Config {
            message,
            path: opt_path,
        } = err
        {
            assert_eq!(message, "failed to parse");
            assert_eq!(opt_path, Some(path));
        } else {
            panic!("Wrong error variant");
        }
    }

    #[test]
    fn test_io_result_ext_attaches_path() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));

        let err = result.at_path("/ledger/TODO.md").unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("/ledger/TODO.md"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::BareIo(_)));
        assert_eq!(err.exit_code(), 5);
    }
}

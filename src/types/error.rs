//! Error types for the bank client registry
//!
//! This module defines all error types that can occur while creating, storing,
//! importing and exporting client records.
//!
//! # Error Categories
//!
//! - **Domain Errors**: Negative principal, unknown category, invalid field values
//! - **Uniqueness Errors**: Duplicate passport in the registry or the store
//! - **Import Errors**: Text blocks that cannot be turned into a client record
//! - **Storage Errors**: Failures reported by the persistence layer
//! - **File I/O and Configuration Errors**

use thiserror::Error;

/// Main error type for the client registry
///
/// Each variant carries enough context to be shown to the user as-is.
/// External errors are converted to their messages so the type stays
/// `Clone + PartialEq` and can be collected into import summaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// An argument violated a domain rule
    ///
    /// Raised for a negative principal, an unrecognized category label or a
    /// field that failed validation. Never recovered internally.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violated rule
        message: String,
    },

    /// A client with this passport already exists
    ///
    /// Raised by the registry and by the store uniqueness check. The operation
    /// is aborted without partial mutation.
    #[error("Client with passport {passport} already exists")]
    DuplicatePassport {
        /// The duplicated passport
        passport: String,
    },

    /// No client with this passport exists
    #[error("Client with passport {passport} not found")]
    ClientNotFound {
        /// The passport that was looked up
        passport: String,
    },

    /// A text block could not be turned into a client record
    ///
    /// This is a recoverable error: the block is skipped and counted,
    /// and the rest of the import continues.
    #[error("Import block {block} rejected: {reason}")]
    ImportBlockRejected {
        /// 1-based index of the block in the input
        block: usize,
        /// Human-readable reason
        reason: String,
    },

    /// The persistence layer reported a failure
    ///
    /// Surfaced as-is, no retry and no rollback of registry state.
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// Description of the storage error
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Tabular (CSV) parsing or writing error
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<rusqlite::Error> for BankError {
    fn from(error: rusqlite::Error) -> Self {
        BankError::PersistenceFailure {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for BankError {
    fn from(error: toml::de::Error) -> Self {
        BankError::ConfigError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BankError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error for a rejected input field
    pub fn invalid_field(field: &str, value: &str, reason: &str) -> Self {
        BankError::InvalidArgument {
            message: format!("{} '{}': {}", field, value, reason),
        }
    }

    /// Create a DuplicatePassport error
    pub fn duplicate_passport(passport: &str) -> Self {
        BankError::DuplicatePassport {
            passport: passport.to_string(),
        }
    }

    /// Create a ClientNotFound error
    pub fn client_not_found(passport: &str) -> Self {
        BankError::ClientNotFound {
            passport: passport.to_string(),
        }
    }

    /// Create an ImportBlockRejected error
    pub fn block_rejected(block: usize, reason: impl Into<String>) -> Self {
        BankError::ImportBlockRejected {
            block,
            reason: reason.into(),
        }
    }

    /// Create a PersistenceFailure error
    pub fn persistence(message: impl Into<String>) -> Self {
        BankError::PersistenceFailure {
            message: message.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(message: impl Into<String>) -> Self {
        BankError::ConfigError {
            message: message.into(),
        }
    }
}

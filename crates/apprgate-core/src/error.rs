//! Error types for the approval gate.
//!
//! Errors are organized by the stage that produces them:
//!
//! - [`NormalizeError`] - Chain payload normalization failures (terminal)
//! - [`CustodyError`] - Failures reported by the custody-service collaborator
//! - [`ProtocolError`] - Submit/poll state machine failures
//! - [`DispatchError`] - Signing dispatch failures
//! - [`ConfigError`] - Configuration loading failures
//! - [`ApprovalGateError`] - Top-level error that wraps all of the above
//!
//! Rule evaluation has no error type: a rule that cannot be evaluated is simply
//! a rule that does not pass.
//!
//! # Example
//!
//! ```rust
//! use apprgate_core::error::{ApprovalGateError, NormalizeError};
//!
//! fn normalize(chain: &str) -> Result<(), ApprovalGateError> {
//!     Err(NormalizeError::unsupported_chain(chain).into())
//! }
//!
//! let err = normalize("Cosmos").unwrap_err();
//! assert_eq!(err.to_string(), "normalization failed: unsupported chain: Cosmos");
//! ```

/// Top-level error type for the approval gate.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalGateError {
    /// A raw payload could not be normalized.
    #[error("normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    /// The approval protocol failed (rejected, timed out, unreadable result).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The custody service reported an error outside of a poll loop.
    #[error("custody service error: {0}")]
    Custody(#[from] CustodyError),

    /// The signing dispatch collaborator failed.
    #[error("signing dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApprovalGateError {
    /// Process exit code used by the CLI for this error.
    ///
    /// - `1` - the approval was rejected
    /// - `3` - the approval timed out
    /// - `4` - the input could not be normalized
    /// - `2` - anything else
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Protocol(ProtocolError::Rejected { .. }) => 1,
            Self::Protocol(ProtocolError::Timeout { .. }) => 3,
            Self::Normalize(_) => 4,
            _ => 2,
        }
    }
}

// ============================================================================
// NormalizeError
// ============================================================================

/// Errors raised while turning a chain-specific payload into a canonical descriptor.
///
/// Both variants are terminal for the submission; callers surface them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The chain name does not map to a known chain family.
    #[error("unsupported chain: {chain}")]
    UnsupportedChain {
        /// The chain name that was requested.
        chain: String,
    },

    /// The payload was not valid base64, hex, binary transaction or JSON.
    #[error("malformed {encoding} payload: {context}")]
    Decode {
        /// Which encoding failed (e.g. "base64", "hex", "json").
        encoding: &'static str,
        /// Decoder message.
        context: String,
    },
}

impl NormalizeError {
    /// Create an `UnsupportedChain` error.
    #[must_use]
    pub fn unsupported_chain(chain: impl Into<String>) -> Self {
        Self::UnsupportedChain {
            chain: chain.into(),
        }
    }

    /// Create a `Decode` error.
    #[must_use]
    pub fn decode(encoding: &'static str, context: impl Into<String>) -> Self {
        Self::Decode {
            encoding,
            context: context.into(),
        }
    }
}

// ============================================================================
// CustodyError
// ============================================================================

/// Errors reported by a custody-service client implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    /// The request never produced a service response (network, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with an error status.
    #[error("service error {code}: {message}")]
    Service {
        /// Service error code.
        code: i64,
        /// Service error message.
        message: String,
    },
}

impl CustodyError {
    /// Create a `Transport` error.
    #[must_use]
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport(context.into())
    }

    /// Create a `Service` error.
    #[must_use]
    pub fn service(code: i64, message: impl Into<String>) -> Self {
        Self::Service {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` when retrying the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// ============================================================================
// ProtocolError
// ============================================================================

/// Errors from the submit-then-poll approval protocol.
///
/// `Rejected`, `Timeout` and `ResultExtraction` are terminal and deliberately
/// distinct: an extraction failure means the record reached `AGREE` but its
/// payload could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The approval record was rejected.
    #[error("approval rejected: {record_id}")]
    Rejected {
        /// The origin record id.
        record_id: String,
    },

    /// The record was still pending after the whole poll budget.
    #[error("approval timeout: {record_id} still pending after {attempts} attempts")]
    Timeout {
        /// The origin record id.
        record_id: String,
        /// Number of poll attempts made.
        attempts: u32,
    },

    /// The record was agreed but no result could be extracted from it.
    #[error("cannot extract result from {record_id}: {reason}")]
    ResultExtraction {
        /// The origin record id.
        record_id: String,
        /// What was wrong with the record.
        reason: String,
    },

    /// The custody service call failed; no poll budget is consumed by this.
    #[error("custody service error: {0}")]
    Custody(#[from] CustodyError),
}

impl ProtocolError {
    /// Create a `Rejected` error.
    #[must_use]
    pub fn rejected(record_id: impl Into<String>) -> Self {
        Self::Rejected {
            record_id: record_id.into(),
        }
    }

    /// Create a `Timeout` error.
    #[must_use]
    pub fn timeout(record_id: impl Into<String>, attempts: u32) -> Self {
        Self::Timeout {
            record_id: record_id.into(),
            attempts,
        }
    }

    /// Create a `ResultExtraction` error.
    #[must_use]
    pub fn extraction(record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResultExtraction {
            record_id: record_id.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// DispatchError
// ============================================================================

/// Errors from the signing-dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The dispatch request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The signing service refused the request.
    #[error("sign request refused ({code}): {message}")]
    Refused {
        /// Service result code.
        code: i64,
        /// Service message.
        message: String,
    },
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// The invalid value.
        value: String,
    },

    /// I/O failure while reading or writing configuration.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an `Io` error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`ApprovalGateError`] as the error type.
pub type Result<T> = std::result::Result<T, ApprovalGateError>;

/// A `Result` type alias for normalization.
pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;

/// A `Result` type alias for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

//! Unified error types for the Ferrogram core.
//!
//! Platform-reported failures (`ok: false`) are deliberately absent here: they
//! travel as [`FallbackResponse`](crate::FallbackResponse) values inside
//! [`Reply::Failed`](crate::Reply::Failed) so callers decide their severity.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors raised by the network layer. Always fatal to the calling code path.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The remote end could not be reached.
    #[error("connection failed: {url} - {reason}")]
    ConnectionFailed {
        /// The URL that failed to connect.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// A connect, inactivity or transfer timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout {
        /// The URL of the timed-out request.
        url: String,
    },

    /// The response body exceeded the configured size limit.
    #[error("response body exceeds limit of {limit} bytes")]
    BodyTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A listener could not be bound.
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl TransportError {
    /// Creates a connection failure for `url`.
    pub fn connection(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConnectionFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a timeout error for `url`.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Masks every occurrence of `secret` in the carried URL.
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let mask = |s: String| s.replace(secret, "<redacted>");
        match self {
            Self::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url: mask(url),
                reason: mask(reason),
            },
            Self::Timeout { url } => Self::Timeout { url: mask(url) },
            Self::Io(reason) => Self::Io(mask(reason)),
            other => other,
        }
    }
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// A raw value does not fit the shape its schema declares.
///
/// Only raised for nested-entity and array-of-entity fields. Scalar fields are
/// cast best-effort and never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The field holds a value of the wrong JSON shape.
    #[error("{entity}.{field}: expected {expected}, found {found}")]
    Mismatch {
        /// Schema name of the owning entity.
        entity: &'static str,
        /// Field name.
        field: String,
        /// Declared shape.
        expected: &'static str,
        /// Observed JSON kind.
        found: &'static str,
    },

    /// A top-level value could not become an entity.
    #[error("cannot materialize {entity} from {found}")]
    NotAnObject {
        /// Target schema name.
        entity: &'static str,
        /// Observed JSON kind.
        found: &'static str,
    },
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by [`Bot::invoke`](crate::Bot::invoke).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The `result` payload could not be mapped to its response type.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The bot token is malformed.
    #[error("invalid bot token: {0}")]
    InvalidToken(String),

    /// A reply helper was used on an update that has no chat.
    #[error("{kind} update has no chat to reply to")]
    MissingChat {
        /// Kind of the update.
        kind: &'static str,
    },
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Errors raised when preparing the dispatch engine.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// Dispatch was started without any handler while at least one is required.
    #[error("no update handlers registered")]
    NoHandlers,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for entity field access.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for RPC calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for dispatch preparation.
pub type DispatchResult<T> = Result<T, DispatchError>;

//! Runtime error types.

use ferrogram_core::{ApiError, DispatchError, TransportError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end a runtime session.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A start-up call to the platform failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The dispatch engine refused to start.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// The transport stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The selected mode needs a cargo feature that is disabled.
    #[error("Update mode '{mode}' requires the '{feature}' feature")]
    ModeUnavailable {
        /// Selected mode.
        mode: &'static str,
        /// Missing feature.
        feature: &'static str,
    },

    /// No outbound HTTP client is available.
    #[error("No HTTP client: enable the 'http-client' feature or call with_client()")]
    NoHttpClient,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

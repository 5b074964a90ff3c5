//! Ferrogram Runtime - orchestration layer for the Ferrogram bot client.
//!
//! This crate provides:
//! - Layered configuration (`ferrogram.toml` / `ferrogram.yaml`, `FERROGRAM_*`)
//! - Logging setup
//! - Update mode selection and the [`FerrogramRuntime`] run loop
//!
//! # Update Modes
//!
//! | `updates.mode` | Transport | Needs |
//! |----------------|-----------|-------|
//! | `webhook` (default) | one update on stdin | - |
//! | `long-polling` | `getUpdates` loop | - |
//! | `socket-server` | HTTP listener | `http-server` feature |
//!
//! Outbound calls use the reqwest client from the `http-client` feature
//! unless another client is supplied with
//! [`FerrogramRuntime::with_client`].
//!
//! ```ignore
//! use ferrogram_runtime::FerrogramRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = FerrogramRuntime::new();
//!     runtime.on_any(|ctx: UpdateContext| async move {
//!         tracing::info!(update_id = ctx.update().id(), "update");
//!     });
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod mode;
pub mod runtime;

// Re-exports
pub use config::{
    BotConfig, ConfigError, ConfigLoader, ConfigResult, FerrogramConfig, HttpConfig,
    LoggingConfig, Profile, ServerSection, UpdatesConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use mode::UpdateMode;
pub use runtime::{FerrogramRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}

//! # Ferrogram
//!
//! An async, strongly-typed client for the Telegram Bot API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐     ┌────────────┐     ┌──────────────────────────────┐
//! │   Transport   │────▶│ Dispatcher │────▶│ handler (concurrent)          │──▶ RPC proxy
//! │ webhook/poll/ │     │            │────▶│ handler (concurrent)          │──▶ RPC proxy
//! │ socket server │     └────────────┘────▶│ ...                           │
//! └───────────────┘                        └──────────────────────────────┘
//! ```
//!
//! - **Transport**: receives raw updates (stdin, `getUpdates`, HTTP listener)
//! - **Dispatcher**: decodes each update once and fans it out to every handler
//! - **Handlers**: async closures receiving an [`UpdateContext`](prelude::UpdateContext)
//! - **RPC proxy**: [`TelegramBot`](api::TelegramBot), mapping replies to typed entities
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrogram::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = FerrogramRuntime::new();
//!     runtime.on(UpdateKind::Message, |ctx: UpdateContext| async move {
//!         ctx.reply("Hi :)").await.map(drop)
//!     });
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): `ferrogram.toml`
//! - `yaml-config`: `ferrogram.yaml`
//! - `json-log`: JSON log lines
//! - `http-client` (default): reqwest-backed outbound client
//! - `http-server` (default): socket server mode

pub use ferrogram_api as api;
pub use ferrogram_core as core;
pub use ferrogram_runtime as runtime;
pub use ferrogram_transport as transport;

/// Commonly used types for writing bots.
///
/// ```rust,ignore
/// use ferrogram::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use ferrogram_runtime::{FerrogramRuntime, UpdateMode};

    // Handlers, updates and entities
    pub use ferrogram_core::prelude::*;
    pub use ferrogram_core::{Command, HandlerFn};

    // RPC proxy
    pub use ferrogram_api::{TelegramBot, Verb};
}

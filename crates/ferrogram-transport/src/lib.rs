//! # Ferrogram Transport
//!
//! Update transports and the outbound HTTP client of the Ferrogram bot client.
//!
//! ## Features
//!
//! - `http-client`: [`ReqwestClient`], the reqwest-backed [`HttpClient`](ferrogram_core::HttpClient)
//! - `http-server`: [`SocketServer`], an axum listener for pushed updates
//! - `full`: both
//!
//! The webhook and long-poll transports are always available.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  ferrogram-runtime   │  (selects a transport by mode)
//! ├──────────────────────┤
//! │  ferrogram-transport │  <- This crate
//! ├──────────────────────┤
//! │  ferrogram-core      │  (Dispatcher, Bot, HttpClient)
//! └──────────────────────┘
//! ```
//!
//! | Transport | Source of updates | Lifetime |
//! |-----------|-------------------|----------|
//! | [`WebhookTransport`] | one request on stdin | single shot |
//! | [`LongPoller`] | `getUpdates` | until cancelled |
//! | `SocketServer` | HTTP POST on a path | until cancelled |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrogram_transport::{LongPollConfig, LongPoller, Transport};
//!
//! let poller = LongPoller::new(LongPollConfig::default());
//! Box::new(poller).run(dispatcher, shutdown_token).await?;
//! ```

pub mod long_poll;
pub mod webhook;

#[cfg(feature = "http-client")]
pub mod http_client;
#[cfg(feature = "http-server")]
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use ferrogram_core::{Dispatcher, TransportResult};
use tokio_util::sync::CancellationToken;

pub use long_poll::{LongPollConfig, LongPoller};
pub use webhook::WebhookTransport;

#[cfg(feature = "http-client")]
pub use http_client::ReqwestClient;
#[cfg(feature = "http-server")]
pub use server::{SECRET_TOKEN_HEADER, SecretTokenLayer, ServerConfig, SocketServer};

/// A source of updates feeding a [`Dispatcher`].
#[async_trait]
pub trait Transport: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Runs until the source is exhausted or `shutdown` is cancelled.
    async fn run(
        self: Box<Self>,
        dispatcher: Arc<Dispatcher>,
        shutdown: CancellationToken,
    ) -> TransportResult<()>;
}

/// Boxed transport as selected by the runtime.
pub type BoxedTransport = Box<dyn Transport>;

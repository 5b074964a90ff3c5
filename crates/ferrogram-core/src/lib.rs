//! # Ferrogram Core
//!
//! The core layer of the Ferrogram bot client.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Entities**: schema-driven, lazily coerced JSON views ([`Entity`], [`Schema`])
//! - **Types**: the static schema catalogue and typed helpers ([`types`])
//! - **Updates**: inbound envelopes and their kinds ([`Update`], [`UpdateKind`])
//! - **Bot seam**: the remote-procedure abstraction ([`Bot`], [`Args`], [`Reply`])
//! - **HTTP seam**: the transport-neutral client abstraction ([`HttpClient`])
//! - **Dispatch**: handlers and concurrent fan-out ([`Handler`], [`Dispatcher`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌───────────┐
//! │ Transport │────▶│ Dispatcher │────▶│  Handler  │──┐
//! │ (payload) │     │   (Core)   │────▶│  Handler  │──┤
//! └───────────┘     └────────────┘     └───────────┘  │
//!                                                     ▼
//!                                      ┌──────────────────┐
//!                                      │ Bot::invoke (API)│
//!                                      └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ferrogram_core::prelude::*;
//!
//! let mut dispatcher = Dispatcher::new(bot);
//! dispatcher.register(on(UpdateKind::Message, |ctx: UpdateContext| async move {
//!     ctx.reply("Hi :)").await?;
//!     Ok::<_, ApiError>(())
//! }));
//!
//! dispatcher.boot(br#"{"update_id":1,"message":{...}}"#).await;
//! ```

pub mod bot;
pub mod context;
pub mod dispatcher;
pub mod entity;
pub mod error;
pub mod handler;
pub mod http;
pub mod types;
pub mod update;

pub use bot::{Args, Bot, BoxedBot, Reply};
pub use context::UpdateContext;
pub use dispatcher::Dispatcher;
pub use entity::{Entity, FieldType, FieldValue, GENERIC, Schema};
pub use error::{
    ApiError, ApiResult, DispatchError, DispatchResult, MappingError, MappingResult,
    TransportError, TransportResult,
};
pub use handler::{
    BoxFuture, BoxedHandler, Handler, HandlerFn, HandlerResponse, Outcome, into_handler, on,
};
pub use http::{BoxedHttpClient, FormBody, FormPart, HttpClient, HttpClientConfig, HttpResponse};
pub use types::{Command, FallbackResponse, MessageExt};
pub use update::{Update, UpdateKind};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        ApiError, ApiResult, Args, Bot, BoxedBot, Dispatcher, Entity, FallbackResponse, Handler,
        MessageExt, Outcome, Reply, Update, UpdateContext, UpdateKind, into_handler, on,
    };
}

//! Update handlers.
//!
//! Any async closure taking an [`UpdateContext`] is a handler:
//!
//! ```rust,ignore
//! use ferrogram_core::{into_handler, on, UpdateKind};
//!
//! let log_all = into_handler(|ctx: UpdateContext| async move {
//!     tracing::info!(update_id = ctx.update().id(), "got update");
//! });
//!
//! let greet = on(UpdateKind::Message, |ctx: UpdateContext| async move {
//!     ctx.reply("Hi :)").await?;
//!     Ok::<_, ApiError>(())
//! });
//! ```

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use futures::FutureExt;

use crate::context::UpdateContext;
use crate::update::UpdateKind;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of running one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion.
    Handled,
    /// The handler's check rejected the update.
    Skipped,
    /// The handler returned an error.
    Failed(String),
}

/// Return types accepted from handler closures.
pub trait HandlerResponse {
    /// Converts into an [`Outcome`].
    fn into_outcome(self) -> Outcome;
}

impl HandlerResponse for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Handled
    }
}

impl HandlerResponse for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl<E: Display> HandlerResponse for Result<(), E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(()) => Outcome::Handled,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// Something that processes updates.
pub trait Handler: Send + Sync {
    /// Cheap synchronous filter; `handle` runs only when this returns `true`.
    fn check(&self, _ctx: &UpdateContext) -> bool {
        true
    }

    /// Processes one update.
    fn handle(&self, ctx: UpdateContext) -> BoxFuture<'_, Outcome>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "handler"
    }
}

/// Boxed handler as stored by the dispatcher.
pub type BoxedHandler = Box<dyn Handler>;

/// Handler backed by an async closure, optionally filtered by update kind.
pub struct HandlerFn<F> {
    f: F,
    kind: Option<UpdateKind>,
    name: String,
}

impl<F> HandlerFn<F> {
    /// Sets the name used in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts the handler to one update kind.
    pub fn only(mut self, kind: UpdateKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl<F, Fut, R> Handler for HandlerFn<F>
where
    F: Fn(UpdateContext) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerResponse + 'static,
{
    fn check(&self, ctx: &UpdateContext) -> bool {
        self.kind.is_none_or(|kind| kind == ctx.kind())
    }

    fn handle(&self, ctx: UpdateContext) -> BoxFuture<'_, Outcome> {
        (self.f)(ctx).map(HandlerResponse::into_outcome).boxed()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps a closure that receives every update.
pub fn into_handler<F, Fut, R>(f: F) -> HandlerFn<F>
where
    F: Fn(UpdateContext) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerResponse + 'static,
{
    HandlerFn {
        f,
        kind: None,
        name: "handler".to_string(),
    }
}

/// Wraps a closure that receives only updates of `kind`.
pub fn on<F, Fut, R>(kind: UpdateKind, f: F) -> HandlerFn<F>
where
    F: Fn(UpdateContext) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerResponse + 'static,
{
    into_handler(f).only(kind).named(kind.as_str())
}

//! Update dispatcher.
//!
//! The [`Dispatcher`] owns the handler registry. For each update it builds
//! one [`UpdateContext`], runs every matching handler concurrently and returns
//! only after all of them have finished:
//!
//! ```text
//!                          ┌──▶ Handler ──┐
//! payload ──▶ Update ──────┼──▶ Handler ──┼──▶ join ──▶ done
//!                          └──▶ Handler ──┘
//! ```
//!
//! The join is what lets the long-poll transport advance its cursor only
//! after an update was fully handled.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{Instrument, Level, debug, span, warn};

use crate::bot::BoxedBot;
use crate::context::UpdateContext;
use crate::error::{DispatchError, DispatchResult};
use crate::handler::{BoxedHandler, Handler, Outcome};
use crate::update::Update;

/// Fans updates out to registered handlers.
///
/// Handlers are registered during setup only; the registry is read-only once
/// the dispatcher is shared behind an `Arc`.
pub struct Dispatcher {
    handlers: Vec<BoxedHandler>,
    bot: BoxedBot,
    require_handlers: bool,
}

impl Dispatcher {
    /// Creates a dispatcher whose contexts carry `bot`.
    pub fn new(bot: BoxedBot) -> Self {
        Self {
            handlers: Vec::new(),
            bot,
            require_handlers: false,
        }
    }

    /// Appends a handler. Registration order is dispatch order.
    pub fn register(&mut self, handler: impl Handler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Appends an already boxed handler.
    pub fn register_boxed(&mut self, handler: BoxedHandler) {
        self.handlers.push(handler);
    }

    /// Appends a handler (builder form).
    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.register(handler);
        self
    }

    /// Requires at least one handler before dispatch may start.
    pub fn require_handlers(mut self, required: bool) -> Self {
        self.require_handlers = required;
        self
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// The bot handed to handlers.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Fails if handlers are required but none is registered.
    pub fn ensure_ready(&self) -> DispatchResult<()> {
        if self.require_handlers && self.handlers.is_empty() {
            return Err(DispatchError::NoHandlers);
        }
        Ok(())
    }

    /// Decodes a raw payload and dispatches it.
    ///
    /// An undecodable payload is an empty update set, not an error. Returns the
    /// number of handlers that ran.
    pub async fn boot(&self, payload: &[u8]) -> usize {
        match Update::from_slice(payload) {
            Some(update) => self.dispatch(update).await,
            None => {
                debug!(len = payload.len(), "Ignoring undecodable update payload");
                0
            }
        }
    }

    /// Runs every matching handler concurrently and waits for all of them.
    ///
    /// Returns the number of handlers that ran.
    pub async fn dispatch(&self, update: Update) -> usize {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            update_id = update.id(),
            kind = %update.kind()
        );

        async move {
            if self.handlers.is_empty() {
                debug!("No handlers registered, dropping update");
                return 0;
            }

            let ctx = UpdateContext::new(Arc::new(update), Arc::clone(&self.bot));
            let runs = self
                .handlers
                .iter()
                .filter(|h| h.check(&ctx))
                .map(|h| async {
                    let outcome = h.handle(ctx.clone()).await;
                    (h.name(), outcome)
                });
            let outcomes = join_all(runs).await;

            for (name, outcome) in &outcomes {
                if let Outcome::Failed(error) = outcome {
                    warn!(handler = %name, error = %error, "Handler failed");
                }
            }
            debug!(handlers = outcomes.len(), "Update dispatched");
            outcomes.len()
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.handlers.len())
            .field("require_handlers", &self.require_handlers)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bot::{Args, Bot, Reply};
    use crate::error::ApiResult;
    use crate::handler::{into_handler, on};
    use crate::update::UpdateKind;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Records invoked methods and answers `true`.
    #[derive(Default)]
    pub(crate) struct MockBot {
        pub calls: Mutex<Vec<(String, Args)>>,
    }

    #[async_trait]
    impl Bot for MockBot {
        fn id(&self) -> &str {
            "1"
        }

        async fn invoke(&self, method: &str, args: Args) -> ApiResult<Reply> {
            self.calls.lock().push((method.to_string(), args));
            Ok(Reply::Scalar(Value::Bool(true)))
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn message(update_id: i64) -> Vec<u8> {
        format!(r#"{{"update_id":{update_id},"message":{{"message_id":1,"chat":{{"id":2}},"text":"hi"}}}}"#)
            .into_bytes()
    }

    fn counting(counter: &Arc<AtomicUsize>) -> impl Handler + 'static {
        let counter = Arc::clone(counter);
        into_handler(move |_ctx: UpdateContext| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test]
    async fn test_every_handler_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(Arc::new(MockBot::default()));
        for _ in 0..5 {
            dispatcher.register(counting(&counter));
        }

        assert_eq!(dispatcher.boot(&message(1)).await, 5);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_handlers_share_identical_update() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new(Arc::new(MockBot::default()));
        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            dispatcher.register(into_handler(move |ctx: UpdateContext| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().push(ctx.shared_update());
                }
            }));
        }

        dispatcher.boot(&message(7)).await;
        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|u| Arc::ptr_eq(u, &seen[0])));
        assert_eq!(seen[0].id(), 7);
    }

    #[tokio::test]
    async fn test_dispatch_waits_for_slow_handlers() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slow = Arc::clone(&counter);
        let dispatcher = Dispatcher::new(Arc::new(MockBot::default())).with(into_handler(
            move |_ctx: UpdateContext| {
                let slow = Arc::clone(&slow);
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    slow.fetch_add(1, Ordering::SeqCst);
                }
            },
        ));

        dispatcher.boot(&message(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(Arc::new(MockBot::default())).with(counting(&counter));

        assert_eq!(dispatcher.boot(b"{broken").await, 0);
        assert_eq!(dispatcher.boot(b"").await, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_handler_does_not_stop_siblings() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(Arc::new(MockBot::default()))
            .with(into_handler(|_ctx: UpdateContext| async {
                Err::<(), _>("boom")
            }))
            .with(counting(&counter));

        assert_eq!(dispatcher.boot(&message(1)).await, 2);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_kind_filter() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let dispatcher = Dispatcher::new(Arc::new(MockBot::default())).with(on(
            UpdateKind::CallbackQuery,
            move |_ctx: UpdateContext| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
        ));

        assert_eq!(dispatcher.boot(&message(1)).await, 0);
        assert_eq!(
            dispatcher
                .boot(br#"{"update_id":2,"callback_query":{"id":"a"}}"#)
                .await,
            1
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_required_handlers() {
        let bot: BoxedBot = Arc::new(MockBot::default());
        let dispatcher = Dispatcher::new(Arc::clone(&bot)).require_handlers(true);
        assert!(matches!(
            dispatcher.ensure_ready(),
            Err(DispatchError::NoHandlers)
        ));

        let optional = Dispatcher::new(bot);
        assert!(optional.ensure_ready().is_ok());
        assert_eq!(optional.boot(&message(1)).await, 0);
    }

    #[tokio::test]
    async fn test_reply_uses_message_chat() {
        let bot = Arc::new(MockBot::default());
        let dispatcher = Dispatcher::new(bot.clone()).with(into_handler(
            |ctx: UpdateContext| async move { ctx.reply("pong").await.map(|_| ()) },
        ));

        dispatcher.boot(&message(3)).await;
        let calls = bot.calls.lock();
        assert_eq!(calls.len(), 1);
        let (method, args) = &calls[0];
        assert_eq!(method, "sendMessage");
        assert_eq!(args.get("chat_id"), Some(&Value::from(2)));
        assert_eq!(args.get("reply_to_message_id"), Some(&Value::from(1)));
        assert_eq!(args.get("text"), Some(&Value::from("pong")));
    }
}

//! Test doubles shared by the transport tests.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ferrogram_core::{
    ApiResult, Args, Bot, BoxedBot, Dispatcher, Reply, UpdateContext, into_handler,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Bot answering from a script, then with `true`.
#[derive(Default)]
pub(crate) struct ScriptedBot {
    replies: Mutex<VecDeque<ApiResult<Reply>>>,
    pub calls: Mutex<Vec<(String, Args)>>,
}

impl ScriptedBot {
    pub fn with_replies(replies: impl IntoIterator<Item = ApiResult<Reply>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }
}

#[async_trait]
impl Bot for ScriptedBot {
    fn id(&self) -> &str {
        "42"
    }

    async fn invoke(&self, method: &str, args: Args) -> ApiResult<Reply> {
        self.calls.lock().push((method.to_string(), args));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or(Ok(Reply::Scalar(Value::Bool(true))))
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Dispatcher with one handler recording every update id it sees.
pub(crate) fn recording_dispatcher(
    bot: BoxedBot,
) -> (Arc<Dispatcher>, Arc<Mutex<Vec<i64>>>, Arc<AtomicUsize>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let count = Arc::new(AtomicUsize::new(0));
    let (s, c) = (Arc::clone(&seen), Arc::clone(&count));
    let dispatcher = Dispatcher::new(bot).with(into_handler(move |ctx: UpdateContext| {
        let (s, c) = (Arc::clone(&s), Arc::clone(&c));
        async move {
            s.lock().push(ctx.update().id());
            c.fetch_add(1, Ordering::SeqCst);
        }
    }));
    (Arc::new(dispatcher), seen, count)
}

//! Per-dispatch context handed to every handler.

use std::sync::Arc;

use crate::bot::{Args, BoxedBot, Reply};
use crate::entity::Entity;
use crate::error::{ApiError, ApiResult};
use crate::types::MessageExt;
use crate::update::{Update, UpdateKind};

/// The update being dispatched plus the bot that received it.
///
/// Cheap to clone; every handler of one update gets a clone sharing the same
/// decoded [`Update`].
#[derive(Clone)]
pub struct UpdateContext {
    update: Arc<Update>,
    bot: BoxedBot,
}

impl UpdateContext {
    /// Creates a context.
    pub fn new(update: Arc<Update>, bot: BoxedBot) -> Self {
        Self { update, bot }
    }

    /// The update being handled.
    pub fn update(&self) -> &Update {
        &self.update
    }

    /// Shared handle to the update.
    pub fn shared_update(&self) -> Arc<Update> {
        Arc::clone(&self.update)
    }

    /// The bot that received the update.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Kind of the update.
    pub fn kind(&self) -> UpdateKind {
        self.update.kind()
    }

    /// The message the update is about, if any.
    pub fn message(&self) -> Option<Arc<Entity>> {
        self.update.message()
    }

    /// Invokes any remote method.
    pub async fn invoke(&self, method: &str, args: Args) -> ApiResult<Reply> {
        self.bot.invoke(method, args).await
    }

    /// Sends `text` to the update's chat as a reply to its message.
    pub async fn reply(&self, text: impl Into<String>) -> ApiResult<Reply> {
        let message = self.message().ok_or(ApiError::MissingChat {
            kind: self.kind().as_str(),
        })?;
        let chat_id = message.chat_id().ok_or(ApiError::MissingChat {
            kind: self.kind().as_str(),
        })?;

        let mut args = Args::new().with("chat_id", chat_id).with("text", text.into());
        if let Some(id) = message.message_id() {
            args.insert("reply_to_message_id", id);
        }
        self.invoke("sendMessage", args).await
    }

    /// Replaces the text of a message previously sent by the bot.
    pub async fn edit(&self, message: &Entity, text: impl Into<String>) -> ApiResult<Reply> {
        let chat_id = message.chat_id().ok_or(ApiError::MissingChat {
            kind: self.kind().as_str(),
        })?;
        let mut args = Args::new().with("chat_id", chat_id).with("text", text.into());
        if let Some(id) = message.message_id() {
            args.insert("message_id", id);
        }
        self.invoke("editMessageText", args).await
    }

    /// Answers the callback query of this update.
    pub async fn answer_callback(&self, text: Option<&str>) -> ApiResult<Reply> {
        let query_id = self
            .update
            .payload()
            .filter(|_| self.kind() == UpdateKind::CallbackQuery)
            .and_then(|q| q.string("id"))
            .unwrap_or_default();
        let mut args = Args::new().with("callback_query_id", query_id);
        if let Some(text) = text {
            args.insert("text", text);
        }
        self.invoke("answerCallbackQuery", args).await
    }
}

impl std::fmt::Debug for UpdateContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateContext")
            .field("update_id", &self.update.id())
            .field("kind", &self.update.kind())
            .field("bot", &self.bot.id())
            .finish()
    }
}

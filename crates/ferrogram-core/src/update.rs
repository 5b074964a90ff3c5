//! Inbound updates.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::entity::Entity;
use crate::types::UPDATE;

/// Which sub-payload an update carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
    /// A payload field this client does not know.
    Unknown,
}

impl UpdateKind {
    /// All known kinds, in platform order.
    pub const ALL: [UpdateKind; 14] = [
        Self::Message,
        Self::EditedMessage,
        Self::ChannelPost,
        Self::EditedChannelPost,
        Self::InlineQuery,
        Self::ChosenInlineResult,
        Self::CallbackQuery,
        Self::ShippingQuery,
        Self::PreCheckoutQuery,
        Self::Poll,
        Self::PollAnswer,
        Self::MyChatMember,
        Self::ChatMember,
        Self::ChatJoinRequest,
    ];

    /// The payload field name, also used in `allowed_updates`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::EditedMessage => "edited_message",
            Self::ChannelPost => "channel_post",
            Self::EditedChannelPost => "edited_channel_post",
            Self::InlineQuery => "inline_query",
            Self::ChosenInlineResult => "chosen_inline_result",
            Self::CallbackQuery => "callback_query",
            Self::ShippingQuery => "shipping_query",
            Self::PreCheckoutQuery => "pre_checkout_query",
            Self::Poll => "poll",
            Self::PollAnswer => "poll_answer",
            Self::MyChatMember => "my_chat_member",
            Self::ChatMember => "chat_member",
            Self::ChatJoinRequest => "chat_join_request",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown update kind: {s}"))
    }
}

/// One inbound event.
///
/// Immutable once decoded. Dereferences to the underlying [`Entity`] so any
/// field can be read directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    id: i64,
    kind: UpdateKind,
    entity: Entity,
}

impl Update {
    /// Decodes a raw JSON payload.
    ///
    /// Returns `None` for malformed JSON, non-object payloads and objects
    /// without an integer `update_id`.
    pub fn from_slice(payload: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Value>(payload)
            .ok()
            .and_then(Self::from_value)
    }

    /// Builds an update from an already decoded value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(raw) => Self::from_entity(Entity::new(&UPDATE, raw)),
            _ => None,
        }
    }

    /// Builds an update from an entity of any schema.
    pub fn from_entity(entity: Entity) -> Option<Self> {
        let entity = if entity.is(&UPDATE) {
            entity
        } else {
            Entity::new(&UPDATE, entity.into_raw())
        };
        let id = entity.raw().get("update_id")?.as_i64()?;
        let kind = UpdateKind::ALL
            .into_iter()
            .find(|k| entity.isset(k.as_str()))
            .unwrap_or(UpdateKind::Unknown);
        Some(Self { id, kind, entity })
    }

    /// Platform-assigned, monotonically increasing id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The populated sub-payload kind.
    pub fn kind(&self) -> UpdateKind {
        self.kind
    }

    /// The populated sub-payload, typed by its schema.
    pub fn payload(&self) -> Option<Arc<Entity>> {
        match self.kind {
            UpdateKind::Unknown => None,
            kind => self.entity.entity(kind.as_str()).ok().flatten(),
        }
    }

    /// The message this update is about, including the one a callback query
    /// was attached to.
    pub fn message(&self) -> Option<Arc<Entity>> {
        match self.kind {
            UpdateKind::Message
            | UpdateKind::EditedMessage
            | UpdateKind::ChannelPost
            | UpdateKind::EditedChannelPost => self.payload(),
            UpdateKind::CallbackQuery => self.payload()?.entity("message").ok().flatten(),
            _ => None,
        }
    }

    /// Returns the underlying entity.
    pub fn as_entity(&self) -> &Entity {
        &self.entity
    }
}

impl Deref for Update {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageExt;

    #[test]
    fn test_decode_message_update() {
        let raw = br#"{"update_id": 10, "message": {"message_id": 3, "chat": {"id": 5}, "text": "hi"}}"#;
        let update = Update::from_slice(raw).unwrap();

        assert_eq!(update.id(), 10);
        assert_eq!(update.kind(), UpdateKind::Message);
        let message = update.message().unwrap();
        assert_eq!(message.text().as_deref(), Some("hi"));
        assert_eq!(message.chat_id(), Some(5));
    }

    #[test]
    fn test_callback_query_message() {
        let update = Update::from_value(serde_json::json!({
            "update_id": 1,
            "callback_query": {"id": "q", "data": "x", "message": {"message_id": 8}}
        }))
        .unwrap();
        assert_eq!(update.kind(), UpdateKind::CallbackQuery);
        assert_eq!(update.payload().unwrap().string("data").as_deref(), Some("x"));
        assert_eq!(update.message().unwrap().message_id(), Some(8));
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        assert!(Update::from_slice(b"not json").is_none());
        assert!(Update::from_slice(b"[1, 2]").is_none());
        assert!(Update::from_slice(br#"{"message": {}}"#).is_none());
        assert!(Update::from_slice(br#"{"update_id": "7"}"#).is_none());
    }

    #[test]
    fn test_unknown_kind() {
        let update = Update::from_slice(br#"{"update_id": 4, "message_reaction": {}}"#).unwrap();
        assert_eq!(update.kind(), UpdateKind::Unknown);
        assert!(update.payload().is_none());
        assert_eq!("poll_answer".parse::<UpdateKind>(), Ok(UpdateKind::PollAnswer));
    }
}

//! Method response map.
//!
//! Associates RPC method names with the schema their `result` materializes
//! into. Lookup is case-insensitive; unmapped methods yield a generic entity.

use std::collections::HashMap;
use std::sync::LazyLock;

use ferrogram_core::Schema;
use ferrogram_core::types::*;

/// Shape of a method's `result`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape {
    /// A single object.
    Entity(&'static Schema),
    /// An array of objects.
    List(&'static Schema),
}

impl ResponseShape {
    /// Schema of the object (or of each element).
    pub fn schema(&self) -> &'static Schema {
        match self {
            Self::Entity(schema) | Self::List(schema) => schema,
        }
    }
}

use ResponseShape::{Entity, List};

static RESPONSES: &[(&str, ResponseShape)] = &[
    ("getUpdates", List(&UPDATE)),
    ("getWebhookInfo", Entity(&WEBHOOK_INFO)),
    ("getMe", Entity(&USER)),
    ("getMyCommands", List(&BOT_COMMAND)),
    // messages
    ("sendMessage", Entity(&MESSAGE)),
    ("forwardMessage", Entity(&MESSAGE)),
    ("copyMessage", Entity(&MESSAGE_ID)),
    ("sendPhoto", Entity(&MESSAGE)),
    ("sendAudio", Entity(&MESSAGE)),
    ("sendDocument", Entity(&MESSAGE)),
    ("sendVideo", Entity(&MESSAGE)),
    ("sendAnimation", Entity(&MESSAGE)),
    ("sendVoice", Entity(&MESSAGE)),
    ("sendVideoNote", Entity(&MESSAGE)),
    ("sendMediaGroup", List(&MESSAGE)),
    ("sendLocation", Entity(&MESSAGE)),
    ("editMessageLiveLocation", Entity(&MESSAGE)),
    ("stopMessageLiveLocation", Entity(&MESSAGE)),
    ("sendVenue", Entity(&MESSAGE)),
    ("sendContact", Entity(&MESSAGE)),
    ("sendPoll", Entity(&MESSAGE)),
    ("sendDice", Entity(&MESSAGE)),
    ("editMessageText", Entity(&MESSAGE)),
    ("editMessageCaption", Entity(&MESSAGE)),
    ("editMessageMedia", Entity(&MESSAGE)),
    ("editMessageReplyMarkup", Entity(&MESSAGE)),
    ("stopPoll", Entity(&POLL)),
    ("sendSticker", Entity(&MESSAGE)),
    ("sendInvoice", Entity(&MESSAGE)),
    ("sendGame", Entity(&MESSAGE)),
    ("setGameScore", Entity(&MESSAGE)),
    // users and chats
    ("getUserProfilePhotos", Entity(&USER_PROFILE_PHOTOS)),
    ("getFile", Entity(&FILE)),
    ("createChatInviteLink", Entity(&CHAT_INVITE_LINK)),
    ("editChatInviteLink", Entity(&CHAT_INVITE_LINK)),
    ("revokeChatInviteLink", Entity(&CHAT_INVITE_LINK)),
    ("getChat", Entity(&CHAT)),
    ("getChatAdministrators", List(&CHAT_MEMBER)),
    ("getChatMember", Entity(&CHAT_MEMBER)),
    ("getChatMenuButton", Entity(&MENU_BUTTON)),
    // stickers
    ("getStickerSet", Entity(&STICKER_SET)),
    ("uploadStickerFile", Entity(&FILE)),
    ("createNewStickerSet", Entity(&FILE)),
    ("addStickerToSet", Entity(&FILE)),
    // web apps
    ("answerWebAppQuery", Entity(&SENT_WEB_APP_MESSAGE)),
];

static BY_NAME: LazyLock<HashMap<String, ResponseShape>> = LazyLock::new(|| {
    RESPONSES
        .iter()
        .map(|(name, shape)| (name.to_ascii_lowercase(), *shape))
        .collect()
});

/// Looks up the response shape of `method`, ignoring case.
pub fn response_shape(method: &str) -> Option<ResponseShape> {
    BY_NAME.get(&method.to_ascii_lowercase()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_methods() {
        let mut seen = HashSet::new();
        for (name, _) in RESPONSES {
            assert!(seen.insert(name.to_ascii_lowercase()), "duplicate {name}");
        }
        assert_eq!(BY_NAME.len(), RESPONSES.len());
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(response_shape("sendMessage"), Some(Entity(&MESSAGE)));
        assert_eq!(response_shape("SENDMESSAGE"), Some(Entity(&MESSAGE)));
        assert_eq!(response_shape("getupdates"), Some(List(&UPDATE)));
        assert_eq!(response_shape("copyMessage").map(|s| s.schema().name), Some("MessageId"));
        assert_eq!(response_shape("setMyCommands"), None);
    }
}

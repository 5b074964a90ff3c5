//! Bot API entity schemas.
//!
//! Only the fields a client commonly reads are declared; everything else is
//! preserved untyped on the entity.

use crate::entity::{FieldType as T, Schema};

pub static UPDATE: Schema = Schema {
    name: "Update",
    fields: &[
        ("update_id", T::Int),
        ("message", T::Entity(&MESSAGE)),
        ("edited_message", T::Entity(&MESSAGE)),
        ("channel_post", T::Entity(&MESSAGE)),
        ("edited_channel_post", T::Entity(&MESSAGE)),
        ("inline_query", T::Entity(&INLINE_QUERY)),
        ("chosen_inline_result", T::Entity(&CHOSEN_INLINE_RESULT)),
        ("callback_query", T::Entity(&CALLBACK_QUERY)),
        ("shipping_query", T::Entity(&SHIPPING_QUERY)),
        ("pre_checkout_query", T::Entity(&PRE_CHECKOUT_QUERY)),
        ("poll", T::Entity(&POLL)),
        ("poll_answer", T::Entity(&POLL_ANSWER)),
        ("my_chat_member", T::Entity(&CHAT_MEMBER_UPDATED)),
        ("chat_member", T::Entity(&CHAT_MEMBER_UPDATED)),
        ("chat_join_request", T::Entity(&CHAT_JOIN_REQUEST)),
    ],
};

pub static USER: Schema = Schema {
    name: "User",
    fields: &[
        ("id", T::Int),
        ("is_bot", T::Bool),
        ("first_name", T::String),
        ("last_name", T::String),
        ("username", T::String),
        ("language_code", T::String),
        ("is_premium", T::Bool),
        ("can_join_groups", T::Bool),
        ("can_read_all_group_messages", T::Bool),
        ("supports_inline_queries", T::Bool),
    ],
};

pub static CHAT: Schema = Schema {
    name: "Chat",
    fields: &[
        ("id", T::Int),
        ("type", T::String),
        ("title", T::String),
        ("username", T::String),
        ("first_name", T::String),
        ("last_name", T::String),
        ("is_forum", T::Bool),
        ("photo", T::Entity(&CHAT_PHOTO)),
        ("bio", T::String),
        ("description", T::String),
        ("invite_link", T::String),
        ("pinned_message", T::Entity(&MESSAGE)),
        ("slow_mode_delay", T::Int),
        ("linked_chat_id", T::Int),
    ],
};

pub static CHAT_PHOTO: Schema = Schema {
    name: "ChatPhoto",
    fields: &[
        ("small_file_id", T::String),
        ("small_file_unique_id", T::String),
        ("big_file_id", T::String),
        ("big_file_unique_id", T::String),
    ],
};

pub static MESSAGE: Schema = Schema {
    name: "Message",
    fields: &[
        ("message_id", T::Int),
        ("message_thread_id", T::Int),
        ("from", T::Entity(&USER)),
        ("sender_chat", T::Entity(&CHAT)),
        ("date", T::Int),
        ("chat", T::Entity(&CHAT)),
        ("forward_from", T::Entity(&USER)),
        ("forward_from_chat", T::Entity(&CHAT)),
        ("forward_date", T::Int),
        ("is_topic_message", T::Bool),
        ("is_automatic_forward", T::Bool),
        ("reply_to_message", T::Entity(&MESSAGE)),
        ("via_bot", T::Entity(&USER)),
        ("edit_date", T::Int),
        ("has_protected_content", T::Bool),
        ("media_group_id", T::String),
        ("author_signature", T::String),
        ("text", T::String),
        ("entities", T::Array(&MESSAGE_ENTITY)),
        ("animation", T::Entity(&ANIMATION)),
        ("audio", T::Entity(&AUDIO)),
        ("document", T::Entity(&DOCUMENT)),
        ("photo", T::Array(&PHOTO_SIZE)),
        ("sticker", T::Entity(&STICKER)),
        ("video", T::Entity(&VIDEO)),
        ("voice", T::Entity(&VOICE)),
        ("caption", T::String),
        ("caption_entities", T::Array(&MESSAGE_ENTITY)),
        ("contact", T::Entity(&CONTACT)),
        ("dice", T::Entity(&DICE)),
        ("poll", T::Entity(&POLL)),
        ("location", T::Entity(&LOCATION)),
        ("new_chat_members", T::Array(&USER)),
        ("left_chat_member", T::Entity(&USER)),
        ("new_chat_title", T::String),
        ("new_chat_photo", T::Array(&PHOTO_SIZE)),
        ("delete_chat_photo", T::Bool),
        ("group_chat_created", T::Bool),
        ("migrate_to_chat_id", T::Int),
        ("migrate_from_chat_id", T::Int),
        ("pinned_message", T::Entity(&MESSAGE)),
        ("reply_markup", T::Entity(&INLINE_KEYBOARD_MARKUP)),
    ],
};

pub static MESSAGE_ID: Schema = Schema {
    name: "MessageId",
    fields: &[("message_id", T::Int)],
};

pub static MESSAGE_ENTITY: Schema = Schema {
    name: "MessageEntity",
    fields: &[
        ("type", T::String),
        ("offset", T::Int),
        ("length", T::Int),
        ("url", T::String),
        ("user", T::Entity(&USER)),
        ("language", T::String),
        ("custom_emoji_id", T::String),
    ],
};

pub static PHOTO_SIZE: Schema = Schema {
    name: "PhotoSize",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("width", T::Int),
        ("height", T::Int),
        ("file_size", T::Int),
    ],
};

pub static ANIMATION: Schema = Schema {
    name: "Animation",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("width", T::Int),
        ("height", T::Int),
        ("duration", T::Int),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
        ("file_name", T::String),
        ("mime_type", T::String),
        ("file_size", T::Int),
    ],
};

pub static AUDIO: Schema = Schema {
    name: "Audio",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("duration", T::Int),
        ("performer", T::String),
        ("title", T::String),
        ("file_name", T::String),
        ("mime_type", T::String),
        ("file_size", T::Int),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
    ],
};

pub static DOCUMENT: Schema = Schema {
    name: "Document",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
        ("file_name", T::String),
        ("mime_type", T::String),
        ("file_size", T::Int),
    ],
};

pub static VIDEO: Schema = Schema {
    name: "Video",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("width", T::Int),
        ("height", T::Int),
        ("duration", T::Int),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
        ("file_name", T::String),
        ("mime_type", T::String),
        ("file_size", T::Int),
    ],
};

pub static VOICE: Schema = Schema {
    name: "Voice",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("duration", T::Int),
        ("mime_type", T::String),
        ("file_size", T::Int),
    ],
};

pub static STICKER: Schema = Schema {
    name: "Sticker",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("type", T::String),
        ("width", T::Int),
        ("height", T::Int),
        ("is_animated", T::Bool),
        ("is_video", T::Bool),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
        ("emoji", T::String),
        ("set_name", T::String),
        ("file_size", T::Int),
    ],
};

pub static STICKER_SET: Schema = Schema {
    name: "StickerSet",
    fields: &[
        ("name", T::String),
        ("title", T::String),
        ("sticker_type", T::String),
        ("is_animated", T::Bool),
        ("is_video", T::Bool),
        ("stickers", T::Array(&STICKER)),
        ("thumbnail", T::Entity(&PHOTO_SIZE)),
    ],
};

pub static CONTACT: Schema = Schema {
    name: "Contact",
    fields: &[
        ("phone_number", T::String),
        ("first_name", T::String),
        ("last_name", T::String),
        ("user_id", T::Int),
        ("vcard", T::String),
    ],
};

pub static DICE: Schema = Schema {
    name: "Dice",
    fields: &[("emoji", T::String), ("value", T::Int)],
};

pub static LOCATION: Schema = Schema {
    name: "Location",
    fields: &[
        ("longitude", T::Float),
        ("latitude", T::Float),
        ("horizontal_accuracy", T::Float),
        ("live_period", T::Int),
        ("heading", T::Int),
    ],
};

pub static POLL: Schema = Schema {
    name: "Poll",
    fields: &[
        ("id", T::String),
        ("question", T::String),
        ("options", T::Array(&POLL_OPTION)),
        ("total_voter_count", T::Int),
        ("is_closed", T::Bool),
        ("is_anonymous", T::Bool),
        ("type", T::String),
        ("allows_multiple_answers", T::Bool),
        ("correct_option_id", T::Int),
        ("explanation", T::String),
    ],
};

pub static POLL_OPTION: Schema = Schema {
    name: "PollOption",
    fields: &[("text", T::String), ("voter_count", T::Int)],
};

pub static POLL_ANSWER: Schema = Schema {
    name: "PollAnswer",
    fields: &[
        ("poll_id", T::String),
        ("user", T::Entity(&USER)),
        ("option_ids", T::Raw),
    ],
};

pub static CALLBACK_QUERY: Schema = Schema {
    name: "CallbackQuery",
    fields: &[
        ("id", T::String),
        ("from", T::Entity(&USER)),
        ("message", T::Entity(&MESSAGE)),
        ("inline_message_id", T::String),
        ("chat_instance", T::String),
        ("data", T::String),
        ("game_short_name", T::String),
    ],
};

pub static INLINE_QUERY: Schema = Schema {
    name: "InlineQuery",
    fields: &[
        ("id", T::String),
        ("from", T::Entity(&USER)),
        ("query", T::String),
        ("offset", T::String),
        ("chat_type", T::String),
        ("location", T::Entity(&LOCATION)),
    ],
};

pub static CHOSEN_INLINE_RESULT: Schema = Schema {
    name: "ChosenInlineResult",
    fields: &[
        ("result_id", T::String),
        ("from", T::Entity(&USER)),
        ("location", T::Entity(&LOCATION)),
        ("inline_message_id", T::String),
        ("query", T::String),
    ],
};

pub static SHIPPING_QUERY: Schema = Schema {
    name: "ShippingQuery",
    fields: &[
        ("id", T::String),
        ("from", T::Entity(&USER)),
        ("invoice_payload", T::String),
        ("shipping_address", T::Raw),
    ],
};

pub static PRE_CHECKOUT_QUERY: Schema = Schema {
    name: "PreCheckoutQuery",
    fields: &[
        ("id", T::String),
        ("from", T::Entity(&USER)),
        ("currency", T::String),
        ("total_amount", T::Int),
        ("invoice_payload", T::String),
        ("shipping_option_id", T::String),
    ],
};

/// Union of the `ChatMember*` variants, discriminated by `status`.
pub static CHAT_MEMBER: Schema = Schema {
    name: "ChatMember",
    fields: &[
        ("status", T::String),
        ("user", T::Entity(&USER)),
        ("is_anonymous", T::Bool),
        ("custom_title", T::String),
        ("until_date", T::Int),
        ("is_member", T::Bool),
        ("can_be_edited", T::Bool),
        ("can_manage_chat", T::Bool),
        ("can_delete_messages", T::Bool),
        ("can_restrict_members", T::Bool),
        ("can_promote_members", T::Bool),
        ("can_change_info", T::Bool),
        ("can_invite_users", T::Bool),
        ("can_pin_messages", T::Bool),
        ("can_send_messages", T::Bool),
    ],
};

pub static CHAT_MEMBER_UPDATED: Schema = Schema {
    name: "ChatMemberUpdated",
    fields: &[
        ("chat", T::Entity(&CHAT)),
        ("from", T::Entity(&USER)),
        ("date", T::Int),
        ("old_chat_member", T::Entity(&CHAT_MEMBER)),
        ("new_chat_member", T::Entity(&CHAT_MEMBER)),
        ("invite_link", T::Entity(&CHAT_INVITE_LINK)),
    ],
};

pub static CHAT_JOIN_REQUEST: Schema = Schema {
    name: "ChatJoinRequest",
    fields: &[
        ("chat", T::Entity(&CHAT)),
        ("from", T::Entity(&USER)),
        ("user_chat_id", T::Int),
        ("date", T::Int),
        ("bio", T::String),
        ("invite_link", T::Entity(&CHAT_INVITE_LINK)),
    ],
};

pub static CHAT_INVITE_LINK: Schema = Schema {
    name: "ChatInviteLink",
    fields: &[
        ("invite_link", T::String),
        ("creator", T::Entity(&USER)),
        ("creates_join_request", T::Bool),
        ("is_primary", T::Bool),
        ("is_revoked", T::Bool),
        ("name", T::String),
        ("expire_date", T::Int),
        ("member_limit", T::Int),
        ("pending_join_request_count", T::Int),
    ],
};

pub static FILE: Schema = Schema {
    name: "File",
    fields: &[
        ("file_id", T::String),
        ("file_unique_id", T::String),
        ("file_size", T::Int),
        ("file_path", T::String),
    ],
};

pub static USER_PROFILE_PHOTOS: Schema = Schema {
    name: "UserProfilePhotos",
    fields: &[
        ("total_count", T::Int),
        ("photos", T::Matrix(&PHOTO_SIZE)),
    ],
};

pub static WEBHOOK_INFO: Schema = Schema {
    name: "WebhookInfo",
    fields: &[
        ("url", T::String),
        ("has_custom_certificate", T::Bool),
        ("pending_update_count", T::Int),
        ("ip_address", T::String),
        ("last_error_date", T::Int),
        ("last_error_message", T::String),
        ("last_synchronization_error_date", T::Int),
        ("max_connections", T::Int),
        ("allowed_updates", T::Raw),
    ],
};

pub static MENU_BUTTON: Schema = Schema {
    name: "MenuButton",
    fields: &[
        ("type", T::String),
        ("text", T::String),
        ("web_app", T::Raw),
    ],
};

pub static SENT_WEB_APP_MESSAGE: Schema = Schema {
    name: "SentWebAppMessage",
    fields: &[("inline_message_id", T::String)],
};

pub static BOT_COMMAND: Schema = Schema {
    name: "BotCommand",
    fields: &[("command", T::String), ("description", T::String)],
};

pub static INLINE_KEYBOARD_MARKUP: Schema = Schema {
    name: "InlineKeyboardMarkup",
    fields: &[("inline_keyboard", T::Matrix(&INLINE_KEYBOARD_BUTTON))],
};

pub static INLINE_KEYBOARD_BUTTON: Schema = Schema {
    name: "InlineKeyboardButton",
    fields: &[
        ("text", T::String),
        ("url", T::String),
        ("callback_data", T::String),
        ("switch_inline_query", T::String),
        ("switch_inline_query_current_chat", T::String),
        ("pay", T::Bool),
    ],
};

/// Platform failure envelope.
pub static RESPONSE_ERROR: Schema = Schema {
    name: "FallbackResponse",
    fields: &[
        ("ok", T::Bool),
        ("description", T::String),
        ("error_code", T::Int),
        ("retry_after", T::Int),
        ("parameters", T::Entity(&RESPONSE_PARAMETERS)),
    ],
};

pub static RESPONSE_PARAMETERS: Schema = Schema {
    name: "ResponseParameters",
    fields: &[("migrate_to_chat_id", T::Int), ("retry_after", T::Int)],
};

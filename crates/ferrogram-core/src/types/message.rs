//! Read helpers for `Message` entities.

use std::sync::Arc;

use crate::entity::Entity;

/// A bot command parsed from the start of a message, e.g. `/ping@my_bot 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name without the leading slash.
    pub name: String,
    /// Bot username after `@`, if addressed explicitly.
    pub mention: Option<String>,
    /// Remaining text after the command, trimmed.
    pub args: String,
}

impl Command {
    /// Parses `text` if it starts with `/`.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let (name, mention) = match head.split_once('@') {
            Some((name, bot)) => (name, Some(bot.to_string())),
            None => (head, None),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            mention,
            args: args.to_string(),
        })
    }
}

/// Convenience readers for message entities.
pub trait MessageExt {
    /// Text of the message, or its caption for media messages.
    fn text(&self) -> Option<String>;

    /// Id of the chat the message belongs to.
    fn chat_id(&self) -> Option<i64>;

    /// Message id within its chat.
    fn message_id(&self) -> Option<i64>;

    /// Sending user, if any.
    fn sender(&self) -> Option<Arc<Entity>>;

    /// Parsed bot command.
    fn command(&self) -> Option<Command>;

    /// Returns `true` if the message is one of the `names` commands.
    fn is_command(&self, names: &[&str]) -> bool {
        self.command()
            .is_some_and(|cmd| names.iter().any(|n| n.eq_ignore_ascii_case(&cmd.name)))
    }

    /// Returns `true` if the message mentions `@username`.
    fn mentions(&self, username: &str) -> bool;
}

impl MessageExt for Entity {
    fn text(&self) -> Option<String> {
        self.string("text").or_else(|| self.string("caption"))
    }

    fn chat_id(&self) -> Option<i64> {
        self.entity("chat").ok().flatten()?.int("id")
    }

    fn message_id(&self) -> Option<i64> {
        self.int("message_id")
    }

    fn sender(&self) -> Option<Arc<Entity>> {
        self.entity("from").ok().flatten()
    }

    fn command(&self) -> Option<Command> {
        self.string("text").as_deref().and_then(Command::parse)
    }

    fn mentions(&self, username: &str) -> bool {
        let Some(text) = self.text() else {
            return false;
        };
        let wanted = username.trim_start_matches('@');
        let units: Vec<u16> = text.encode_utf16().collect();

        let field = if self.isset("entities") {
            "entities"
        } else {
            "caption_entities"
        };
        self.entities(field).unwrap_or_default().iter().any(|e| {
            match e.string("type").as_deref() {
                Some("mention") => {
                    let offset = e.int("offset").unwrap_or_default().max(0) as usize;
                    let length = e.int("length").unwrap_or_default().max(0) as usize;
                    units
                        .get(offset..offset.saturating_add(length))
                        .map(String::from_utf16_lossy)
                        .is_some_and(|m| m.trim_start_matches('@').eq_ignore_ascii_case(wanted))
                }
                Some("text_mention") => e
                    .entity("user")
                    .ok()
                    .flatten()
                    .and_then(|u| u.string("username"))
                    .is_some_and(|u| u.eq_ignore_ascii_case(wanted)),
                _ => false,
            }
        })
    }
}

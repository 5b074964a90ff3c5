//! Platform failure envelope returned instead of a result.

use std::fmt;
use std::ops::Deref;

use serde_json::{Map, Value};

use super::schemas::RESPONSE_ERROR;
use crate::entity::Entity;

/// A response with `ok: false`, or one whose body could not be decoded.
///
/// Never raised as an error: callers branch on it, e.g. sleeping for
/// [`retry_after`](Self::retry_after) on rate limiting.
#[derive(Clone, PartialEq)]
pub struct FallbackResponse(Entity);

impl FallbackResponse {
    /// Wraps a decoded response envelope.
    pub fn new(raw: Map<String, Value>) -> Self {
        Self(Entity::new(&RESPONSE_ERROR, raw))
    }

    /// Builds a fallback for a body that is not a JSON object.
    pub fn undecodable(reason: impl fmt::Display) -> Self {
        let mut raw = Map::new();
        raw.insert("ok".into(), Value::Bool(false));
        raw.insert(
            "description".into(),
            Value::String(format!("undecodable response body: {reason}")),
        );
        Self::new(raw)
    }

    /// Always `false` for platform failures.
    pub fn ok(&self) -> bool {
        self.0.bool("ok").unwrap_or(false)
    }

    /// Human-readable failure description.
    pub fn description(&self) -> Option<String> {
        self.0.string("description")
    }

    /// Platform error code (HTTP-like).
    pub fn error_code(&self) -> Option<i64> {
        self.0.int("error_code")
    }

    /// Seconds to wait before retrying, from the envelope or its `parameters`.
    pub fn retry_after(&self) -> Option<i64> {
        self.0.int("retry_after").or_else(|| self.parameter("retry_after"))
    }

    /// New chat id when a group was migrated to a supergroup.
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameter("migrate_to_chat_id")
    }

    fn parameter(&self, field: &str) -> Option<i64> {
        self.0.entity("parameters").ok().flatten()?.int(field)
    }

    /// Returns the underlying entity.
    pub fn into_entity(self) -> Entity {
        self.0
    }
}

impl Deref for FallbackResponse {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.0
    }
}

impl fmt::Debug for FallbackResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackResponse")
            .field("error_code", &self.error_code())
            .field("description", &self.description())
            .field("retry_after", &self.retry_after())
            .finish()
    }
}

impl fmt::Display for FallbackResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.error_code(), self.description()) {
            (Some(code), Some(desc)) => write!(f, "platform error {code}: {desc}"),
            (Some(code), None) => write!(f, "platform error {code}"),
            (None, Some(desc)) => f.write_str(&desc),
            (None, None) => f.write_str("platform error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback(value: Value) -> FallbackResponse {
        match value {
            Value::Object(map) => FallbackResponse::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_top_level_retry_after() {
        let f = fallback(json!({"ok": false, "error_code": 429, "retry_after": 3}));
        assert!(!f.ok());
        assert_eq!(f.error_code(), Some(429));
        assert_eq!(f.retry_after(), Some(3));
    }

    #[test]
    fn test_parameters_retry_after_and_migration() {
        let f = fallback(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: group chat was upgraded",
            "parameters": {"retry_after": "5", "migrate_to_chat_id": -100123}
        }));
        assert_eq!(f.retry_after(), Some(5));
        assert_eq!(f.migrate_to_chat_id(), Some(-100123));
        assert_eq!(
            f.to_string(),
            "platform error 400: Bad Request: group chat was upgraded"
        );
    }

    #[test]
    fn test_undecodable() {
        let f = FallbackResponse::undecodable("expected value at line 1");
        assert!(!f.ok());
        assert!(f.description().unwrap().contains("line 1"));
        assert_eq!(f.error_code(), None);
    }
}

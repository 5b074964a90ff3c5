//! The RPC seam between handlers and the platform.
//!
//! Handlers talk to the platform through [`Bot::invoke`], a single entry point
//! that accepts any method name. Concrete implementations (the HTTP proxy in
//! `ferrogram-api`, or mocks in tests) decide how the call travels.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{Entity, coerce};
use crate::error::{ApiResult, MappingError};
use crate::types::FallbackResponse;

// =============================================================================
// Args
// =============================================================================

/// Named arguments of one RPC call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(Map<String, Value>);

impl Args {
    /// Creates an empty argument bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes the `call(map, extra: v)` shape: `head` (when an object) is
    /// merged with `named`, and `named` wins on key collision.
    pub fn from_call(head: Value, named: Args) -> Self {
        match head {
            Value::Object(map) => Self(map).merge(named),
            _ => named,
        }
    }

    /// Adds an argument (builder form).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces an argument.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Reads an argument.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes an argument.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Overlays `other` on top of `self`.
    pub fn merge(mut self, other: impl Into<Args>) -> Self {
        for (key, value) in other.into().0 {
            self.0.insert(key, value);
        }
        self
    }

    /// Fills keys missing from `self` with `defaults`.
    pub fn with_defaults(self, defaults: &Map<String, Value>) -> Self {
        Self(defaults.clone()).merge(self)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Args {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Entity> for Args {
    fn from(entity: Entity) -> Self {
        Self(entity.into_raw())
    }
}

impl TryFrom<Value> for Args {
    type Error = MappingError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MappingError::NotAnObject {
                entity: "Args",
                found: coerce::kind_of(&other),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Reply
// =============================================================================

/// Outcome of an RPC call that reached the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `result` was a bare scalar (bool, number, string or null).
    Scalar(Value),
    /// `result` was an object, mapped to the method's response type.
    Entity(Entity),
    /// `result` was an array, each element mapped to the response type.
    List(Vec<Entity>),
    /// The platform reported a failure.
    Failed(FallbackResponse),
}

impl Reply {
    /// Returns `true` unless the platform reported a failure.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Borrows the mapped entity.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Takes the mapped entity.
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Takes the mapped list; a single entity becomes a one-element list.
    pub fn into_list(self) -> Option<Vec<Entity>> {
        match self {
            Self::List(items) => Some(items),
            Self::Entity(e) => Some(vec![e]),
            _ => None,
        }
    }

    /// Borrows the scalar result.
    pub fn scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Borrows the platform failure.
    pub fn failure(&self) -> Option<&FallbackResponse> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Splits success from platform failure.
    pub fn into_result(self) -> Result<Reply, FallbackResponse> {
        match self {
            Self::Failed(f) => Err(f),
            ok => Ok(ok),
        }
    }
}

// =============================================================================
// Bot
// =============================================================================

/// A connected bot that can invoke remote methods.
#[async_trait]
pub trait Bot: Send + Sync {
    /// The bot id (numeric prefix of the token).
    fn id(&self) -> &str;

    /// Invokes `method` with `args`.
    ///
    /// Platform failures come back as [`Reply::Failed`]; only transport and
    /// mapping failures are errors.
    async fn invoke(&self, method: &str, args: Args) -> ApiResult<Reply>;

    /// Upcasts for downcasting to the concrete bot type.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Shared handle to a bot.
pub type BoxedBot = Arc<dyn Bot>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_call_named_wins() {
        let args = Args::from_call(
            json!({"chat_id": 1, "text": "old"}),
            Args::new().with("text", "new").with("parse_mode", "HTML"),
        );
        assert_eq!(args.get("chat_id"), Some(&json!(1)));
        assert_eq!(args.get("text"), Some(&json!("new")));
        assert_eq!(args.len(), 3);

        let only_named = Args::from_call(json!("ignored"), Args::new().with("a", 1));
        assert_eq!(only_named.len(), 1);
    }

    #[test]
    fn test_defaults_do_not_override() {
        let defaults = json!({"parse_mode": "HTML", "text": "default"});
        let Value::Object(defaults) = defaults else {
            unreachable!()
        };
        let args = Args::new().with("text", "hi").with_defaults(&defaults);
        assert_eq!(args.get("text"), Some(&json!("hi")));
        assert_eq!(args.get("parse_mode"), Some(&json!("HTML")));
    }

    #[test]
    fn test_try_from_value() {
        assert!(Args::try_from(json!({"a": 1})).is_ok());
        assert!(Args::try_from(json!([1])).is_err());
    }
}

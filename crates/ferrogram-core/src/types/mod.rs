//! Bot API entity types.
//!
//! Every type is a static [`Schema`](crate::entity::Schema); values are
//! [`Entity`](crate::entity::Entity) instances materialized with one of them.

mod fallback;
mod message;
mod schemas;

pub use fallback::FallbackResponse;
pub use message::{Command, MessageExt};
pub use schemas::*;

//! # Ferrogram API
//!
//! The RPC proxy of the Ferrogram bot client.
//!
//! [`TelegramBot`] implements [`ferrogram_core::Bot`] over any
//! [`ferrogram_core::HttpClient`]. Every call is normalized (defaults merged,
//! falsy values dropped, local files attached), posted to
//! `{api_url}/bot{token}/{method}` and the `result` is materialized through the
//! [method response map](responses).
//!
//! Platform failures are returned as [`Reply::Failed`](ferrogram_core::Reply)
//! values; only transport and mapping failures are errors.

pub mod bot;
pub mod config;
pub mod request;
pub mod responses;

pub use bot::TelegramBot;
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use request::Verb;
pub use responses::{ResponseShape, response_shape};

//! Configuration for the Ferrogram runtime.
//!
//! Layered loading (defaults, files, environment) lives in [`loader`]; the
//! schema in [`schema`]; cross-field checks in [`validation`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BotConfig, FerrogramConfig, HttpConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    ServerSection, UpdatesConfig,
};
pub use validation::validate_config;

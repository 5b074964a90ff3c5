//! Configuration schema definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [bot]
//! token = "123456:ABC-DEF"
//! default_params = { parse_mode = "HTML" }
//!
//! [http]
//! transfer_timeout_secs = 90
//!
//! [updates]
//! mode = "socket-server"
//!
//! [updates.server]
//! port = 8443
//! path = "/telegram"
//! secret_token = "s3cret"
//! webhook_url = "https://bot.example.org/telegram"
//!
//! [logging]
//! level = "debug"
//! format = "pretty"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use ferrogram_api::{ApiConfig, DEFAULT_API_URL};
use ferrogram_core::HttpClientConfig;
use ferrogram_transport::LongPollConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FerrogramConfig {
    /// Bot identity and call defaults.
    pub bot: BotConfig,

    /// Outbound HTTP limits.
    pub http: HttpConfig,

    /// How updates are received.
    pub updates: UpdatesConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

// =============================================================================
// Bot
// =============================================================================

/// Bot settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot token, `<id>:<secret>`.
    pub token: String,

    /// Platform base URL.
    pub api_url: String,

    /// Arguments merged underneath every call.
    pub default_params: Map<String, Value>,

    /// Refuse to start without any registered handler.
    pub require_handlers: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            default_params: Map::new(),
            require_handlers: false,
        }
    }
}

impl BotConfig {
    /// Converts to the RPC proxy configuration.
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            default_params: self.default_params.clone(),
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("default_params", &self.default_params)
            .field("require_handlers", &self.require_handlers)
            .finish()
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Outbound HTTP limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout.
    pub connect_timeout_secs: u64,

    /// Longest allowed pause between two reads.
    pub inactivity_timeout_secs: u64,

    /// Total time allowed per request.
    pub transfer_timeout_secs: u64,

    /// Largest accepted response body, in kilobytes.
    pub body_size_limit_kb: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            inactivity_timeout_secs: 30,
            transfer_timeout_secs: 60,
            body_size_limit_kb: 10_000,
        }
    }
}

impl HttpConfig {
    /// Converts to the client configuration.
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::default()
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_inactivity_timeout(Duration::from_secs(self.inactivity_timeout_secs))
            .with_transfer_timeout(Duration::from_secs(self.transfer_timeout_secs))
            .with_body_size_limit(self.body_size_limit_kb.saturating_mul(1000) as usize)
    }
}

// =============================================================================
// Updates
// =============================================================================

/// Update reception settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatesConfig {
    /// `webhook`, `long-polling` or `socket-server`.
    pub mode: String,

    /// Delay between two `getUpdates` calls.
    pub poll_interval_ms: u64,

    /// Server-side long-poll timeout.
    pub poll_timeout_secs: u64,

    /// Update kinds to receive; empty means platform default.
    pub allowed_updates: Vec<String>,

    /// Discard updates queued before start-up.
    pub drop_pending_updates: bool,

    /// Socket server settings.
    pub server: ServerSection,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            mode: "webhook".to_string(),
            poll_interval_ms: 100,
            poll_timeout_secs: 0,
            allowed_updates: Vec::new(),
            drop_pending_updates: false,
            server: ServerSection::default(),
        }
    }
}

impl UpdatesConfig {
    /// Long-poll transport settings.
    pub fn long_poll_config(&self) -> LongPollConfig {
        LongPollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: self.poll_timeout_secs,
            allowed_updates: self.allowed_updates.clone(),
            drop_pending_updates: self.drop_pending_updates,
        }
    }
}

/// Socket server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Hosts to bind.
    pub hosts: Vec<String>,

    /// Port shared by all hosts.
    pub port: u16,

    /// Route receiving updates.
    pub path: String,

    /// Shared secret expected in the secret-token header.
    pub secret_token: Option<String>,

    /// Public URL registered with `setWebhook` on start-up.
    pub webhook_url: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            hosts: vec!["0.0.0.0".to_string(), "::".to_string()],
            port: 8000,
            path: "/".to_string(),
            secret_token: None,
            webhook_url: None,
        }
    }
}

#[cfg(feature = "http-server")]
impl ServerSection {
    /// Socket server transport settings.
    pub fn to_server_config(&self) -> ferrogram_transport::ServerConfig {
        ferrogram_transport::ServerConfig {
            hosts: self.hosts.clone(),
            port: self.port,
            path: self.path.clone(),
            secret_token: self.secret_token.clone(),
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name, as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `full` otherwise.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` overrides it.
    pub level: LogLevel,

    /// Line layout.
    pub format: LogFormat,

    /// Destination.
    pub output: LogOutput,

    /// File written when `output` is `file`.
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `ferrogram_transport = "trace"`.
    pub filters: HashMap<String, LogLevel>,

    /// Include thread ids.
    pub thread_ids: bool,

    /// Include source file and line.
    pub file_location: bool,
}

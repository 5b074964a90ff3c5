//! Configuration of the RPC proxy.
//!
//! # Example Configuration
//!
//! ```yaml
//! bot:
//!   token: ${BOT_TOKEN}
//!   api_url: https://api.telegram.org
//!   default_params:
//!     parse_mode: HTML
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default platform endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Settings of one bot identity.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bot token, `<id>:<secret>`.
    pub token: String,

    /// Base URL of the platform, without trailing slash.
    pub api_url: String,

    /// Arguments merged underneath every call's own arguments.
    pub default_params: Map<String, Value>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            default_params: Map::new(),
        }
    }
}

impl ApiConfig {
    /// Creates a config for `token` with default endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Sets the base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Adds a default argument.
    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("default_params", &self.default_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let yaml = "token: '123:abc'";
        let config: ApiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.default_params.is_empty());
    }

    #[test]
    fn test_deserialize_full() {
        let yaml = r#"
token: "123:abc"
api_url: http://localhost:8081
default_params:
  parse_mode: HTML
  disable_notification: true
"#;
        let config: ApiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_url, "http://localhost:8081");
        assert_eq!(config.default_params["parse_mode"], "HTML");
        assert_eq!(config.default_params["disable_notification"], true);
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", ApiConfig::new("123:secret"));
        assert!(!debug.contains("secret"));
    }
}

//! Errors raised while loading or checking a [`FerrogramConfig`].
//!
//! [`FerrogramConfig`]: super::FerrogramConfig

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// figment could not merge or extract the sources.
    #[error("cannot read configuration: {0}")]
    ParseError(String),

    #[error("bad configuration: {message}")]
    ValidationError { message: String },

    #[error("`{field}` is required")]
    MissingField { field: String },

    #[error("unknown update mode `{0}`, use webhook, long-polling or socket-server")]
    UnsupportedMode(String),

    #[error("`{url}` is not usable: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Socket server port `0`.
    #[error("port {0} cannot be listened on")]
    InvalidPort(u16),
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        assert_eq!(
            ConfigError::missing_field("bot.token").to_string(),
            "`bot.token` is required"
        );
        assert!(
            ConfigError::UnsupportedMode("cgi-bin".into())
                .to_string()
                .contains("`cgi-bin`")
        );
    }

    #[test]
    fn test_figment_errors_convert() {
        let err: ConfigError = figment::Error::from("bad key".to_string()).into();
        assert!(matches!(err, ConfigError::ParseError(ref m) if m.contains("bad key")));
    }
}

//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, FerrogramConfig, HttpConfig, ServerSection, UpdatesConfig};
use crate::mode::UpdateMode;

/// Validates the entire configuration.
pub fn validate_config(config: &FerrogramConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_http_config(&config.http)?;
    validate_updates_config(&config.updates, &config.http)?;
    Ok(())
}

/// Validates bot identity settings.
fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.token.is_empty() {
        return Err(ConfigError::missing_field("bot.token"));
    }

    let well_formed = bot
        .token
        .split_once(':')
        .is_some_and(|(id, secret)| {
            !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && !secret.is_empty()
        });
    if !well_formed {
        return Err(ConfigError::validation(
            "bot.token must look like <numeric id>:<secret>",
        ));
    }

    validate_url(&bot.api_url, "bot.api_url")
}

/// Validates outbound HTTP limits.
fn validate_http_config(http: &HttpConfig) -> ConfigResult<()> {
    if http.connect_timeout_secs == 0
        || http.inactivity_timeout_secs == 0
        || http.transfer_timeout_secs == 0
    {
        return Err(ConfigError::validation("HTTP timeouts must be greater than 0"));
    }

    if http.body_size_limit_kb == 0 {
        return Err(ConfigError::validation(
            "http.body_size_limit_kb must be greater than 0",
        ));
    }

    Ok(())
}

/// Validates update reception settings.
fn validate_updates_config(updates: &UpdatesConfig, http: &HttpConfig) -> ConfigResult<()> {
    let mode: UpdateMode = updates.mode.parse()?;

    match mode {
        UpdateMode::Webhook => {}
        UpdateMode::LongPolling => {
            if updates.poll_interval_ms == 0 {
                return Err(ConfigError::validation(
                    "updates.poll_interval_ms must be greater than 0",
                ));
            }
            // The platform sends nothing while it holds a long poll, so both
            // the idle timer and the total deadline must outlast it.
            let (limit, field) = if http.inactivity_timeout_secs <= http.transfer_timeout_secs {
                (http.inactivity_timeout_secs, "http.inactivity_timeout_secs")
            } else {
                (http.transfer_timeout_secs, "http.transfer_timeout_secs")
            };
            if updates.poll_timeout_secs >= limit {
                return Err(ConfigError::validation(format!(
                    "updates.poll_timeout_secs ({}) must be below {field} ({limit})",
                    updates.poll_timeout_secs
                )));
            }
        }
        UpdateMode::SocketServer => validate_server_section(&updates.server)?,
    }

    Ok(())
}

/// Validates socket server settings.
fn validate_server_section(server: &ServerSection) -> ConfigResult<()> {
    if server.port == 0 {
        return Err(ConfigError::InvalidPort(server.port));
    }

    if server.hosts.is_empty() {
        return Err(ConfigError::missing_field("updates.server.hosts"));
    }

    if !server.path.starts_with('/') {
        return Err(ConfigError::validation(format!(
            "updates.server.path must start with '/': {}",
            server.path
        )));
    }

    if let Some(url) = &server.webhook_url {
        validate_url(url, "updates.server.webhook_url")?;
    }

    Ok(())
}

/// Validates an http(s) URL.
fn validate_url(url: &str, field: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field(field));
    }

    if !["http://", "https://"].iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("{field} must start with http:// or https://"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FerrogramConfig {
        let mut config = FerrogramConfig::default();
        config.bot.token = "123456:ABC-def".into();
        config
    }

    #[test]
    fn test_valid_default_with_token() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_token_required_and_shaped() {
        let mut config = valid();
        config.bot.token.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { ref field }) if field == "bot.token"
        ));

        for bad in ["abc:def", "123456", ":secret", "123:"] {
            config.bot.token = bad.into();
            assert!(
                matches!(validate_config(&config), Err(ConfigError::ValidationError { .. })),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_api_url_scheme() {
        let mut config = valid();
        config.bot.api_url = "ftp://api.telegram.org".into();
        assert!(matches!(validate_config(&config), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_unknown_mode() {
        let mut config = valid();
        config.updates.mode = "smoke-signals".into();
        assert!(matches!(validate_config(&config), Err(ConfigError::UnsupportedMode(_))));
    }

    #[test]
    fn test_long_poll_limits() {
        let mut config = valid();
        config.updates.mode = "long-polling".into();
        config.updates.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());

        config.updates.poll_interval_ms = 100;
        config.updates.poll_timeout_secs = 60;
        assert!(validate_config(&config).is_err());

        config.updates.poll_timeout_secs = 29;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_long_poll_must_outlast_idle_timer() {
        let mut config = valid();
        config.updates.mode = "long-polling".into();
        config.updates.poll_timeout_secs = 45;
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref message }
                if message.contains("http.inactivity_timeout_secs (30)")),
            "{err}"
        );

        config.http.inactivity_timeout_secs = 50;
        assert!(validate_config(&config).is_ok());

        config.http.inactivity_timeout_secs = 120;
        config.http.transfer_timeout_secs = 40;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http.transfer_timeout_secs (40)"), "{err}");
    }

    #[test]
    fn test_http_limits() {
        let mut config = valid();
        config.http.body_size_limit_kb = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid();
        config.http.connect_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_server_section() {
        let mut config = valid();
        config.updates.mode = "socket-server".into();
        config.updates.server.port = 0;
        assert!(matches!(validate_config(&config), Err(ConfigError::InvalidPort(0))));

        config.updates.server.port = 8443;
        config.updates.server.path = "hook".into();
        assert!(validate_config(&config).is_err());

        config.updates.server.path = "/hook".into();
        config.updates.server.webhook_url = Some("bot.example.org/hook".into());
        assert!(matches!(validate_config(&config), Err(ConfigError::InvalidUrl { .. })));

        config.updates.server.webhook_url = Some("https://bot.example.org/hook".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_server_section_ignored_outside_server_mode() {
        let mut config = valid();
        config.updates.server.port = 0;
        assert!(validate_config(&config).is_ok());
    }
}

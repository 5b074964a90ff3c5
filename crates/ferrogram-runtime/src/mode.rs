//! Update reception modes.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// How the runtime receives updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UpdateMode {
    /// One update per process, read from stdin, acknowledged on stdout.
    #[default]
    Webhook,
    /// Repeated `getUpdates` calls.
    LongPolling,
    /// Local HTTP listener receiving pushed updates.
    SocketServer,
}

impl UpdateMode {
    /// Canonical name, as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::LongPolling => "long-polling",
            Self::SocketServer => "socket-server",
        }
    }

    /// Whether the mode talks to the platform over stdin and stdout.
    pub fn uses_stdio(&self) -> bool {
        matches!(self, Self::Webhook)
    }
}

impl FromStr for UpdateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "webhook" | "cgi" => Ok(Self::Webhook),
            "long-polling" | "long-poll" | "polling" => Ok(Self::LongPolling),
            "socket-server" | "server" | "http-server" => Ok(Self::SocketServer),
            _ => Err(ConfigError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("webhook".parse::<UpdateMode>().unwrap(), UpdateMode::Webhook);
        assert_eq!("Long_Polling".parse::<UpdateMode>().unwrap(), UpdateMode::LongPolling);
        assert_eq!("polling".parse::<UpdateMode>().unwrap(), UpdateMode::LongPolling);
        assert_eq!(" server ".parse::<UpdateMode>().unwrap(), UpdateMode::SocketServer);
    }

    #[test]
    fn test_unknown_mode() {
        let err = "carrier-pigeon".parse::<UpdateMode>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedMode(ref m) if m == "carrier-pigeon"));
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [UpdateMode::Webhook, UpdateMode::LongPolling, UpdateMode::SocketServer] {
            assert_eq!(mode.to_string().parse::<UpdateMode>().unwrap(), mode);
        }
        assert!(UpdateMode::default().uses_stdio());
    }
}

//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config`: enables `ferrogram.toml`
//! - `yaml-config`: enables `ferrogram.yaml` / `ferrogram.yml`
//!
//! Both can be enabled; both formats are then searched and merged.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific file (`ferrogram.{profile}.toml` / `ferrogram.{profile}.yaml`)
//! 3. Main file (`ferrogram.toml` / `ferrogram.yaml`)
//! 4. Environment variables (`FERROGRAM_*`)
//! 5. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! `FERROGRAM_` prefix, `__` between nesting levels:
//!
//! - `FERROGRAM_BOT__TOKEN=123:abc` → `bot.token`
//! - `FERROGRAM_UPDATES__MODE=long-polling` → `updates.mode`
//! - `FERROGRAM_UPDATES__SERVER__PORT=8443` → `updates.server.port`
//!
//! `FERROGRAM_PROFILE` selects the profile.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrogram_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().profile("production").load()?;
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::FerrogramConfig;

const ENV_PREFIX: &str = "FERROGRAM_";
const APP_DIR: &str = "ferrogram";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `FERROGRAM_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(format!("{ENV_PREFIX}PROFILE"))
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides.
    figment: Figment,
    /// Explicit profile; `None` reads `FERROGRAM_PROFILE` at load time.
    profile: Option<Profile>,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: None,
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Some(Profile::parse(profile.as_ref()));
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds the user config directory to the search paths.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join(APP_DIR)),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables environment variables (default).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, above every other source.
    pub fn merge(mut self, config: FerrogramConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Merges a single value at a dotted key, e.g. `("updates.mode", "long-polling")`.
    pub fn set(mut self, key: &str, value: impl serde::Serialize) -> Self {
        self.figment = self.figment.merge(Serialized::default(key, value));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<FerrogramConfig> {
        let profile = self.profile.clone().unwrap_or_else(Profile::from_env);
        let figment = self.build_figment(&profile)?;

        let config: FerrogramConfig = figment.extract()?;

        debug!(
            profile = %profile,
            mode = %config.updates.mode,
            log_level = %config.logging.level,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn build_figment(mut self, profile: &Profile) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FerrogramConfig::default()));

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            debug!(path = %path.display(), "Using explicit configuration file");
            figment = Self::merge_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment, profile);
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["profile"]));
        }

        Ok(figment.merge(std::mem::take(&mut self.figment)))
    }

    /// Merges one file, choosing the provider by extension.
    fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        match path.extension().and_then(OsStr::to_str) {
            #[cfg(feature = "toml-config")]
            Some("toml") => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
            other => Err(ConfigError::ParseError(format!(
                "{}: format .{} not supported by the enabled features",
                path.display(),
                other.unwrap_or_default()
            ))),
        }
    }

    /// Explicit search paths, or the current and user config directories.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join(APP_DIR)))
            .collect()
    }

    /// Merges the files of the first directory holding a main file, for every
    /// enabled format: the profile variant first, the main file above it.
    fn load_config_files(&self, mut figment: Figment, profile: &Profile) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        for extensions in FORMATS {
            let hit = search_paths.iter().find_map(|dir| {
                extensions.iter().find_map(|ext| {
                    let main = dir.join(format!("{APP_DIR}.{ext}"));
                    main.exists()
                        .then(|| (dir.join(format!("{APP_DIR}.{profile}.{ext}")), main))
                })
            });
            let Some((profile_file, main_file)) = hit else {
                continue;
            };

            for path in [profile_file, main_file] {
                if !path.exists() {
                    continue;
                }
                match Self::merge_file(figment.clone(), &path) {
                    Ok(merged) => {
                        info!(path = %path.display(), "Loading configuration file");
                        figment = merged;
                        found = true;
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping configuration file"),
                }
            }
        }

        if !found {
            warn!("No configuration file found, using defaults and environment");
        }
        figment
    }
}

/// File extensions per enabled format, in merge order.
const FORMATS: &[&[&str]] = &[
    #[cfg(feature = "toml-config")]
    &["toml"],
    #[cfg(feature = "yaml-config")]
    &["yaml", "yml"],
];

// =============================================================================
// Tests
// =============================================================================

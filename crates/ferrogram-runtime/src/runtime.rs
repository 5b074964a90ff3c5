//! Main runtime orchestration.
//!
//! The runtime owns the configuration and the registered handlers. On
//! [`run`](FerrogramRuntime::run) it builds the RPC proxy, the dispatcher and
//! the transport selected by `updates.mode`, then drives the transport until
//! it finishes or a shutdown signal arrives.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ferrogram_runtime::FerrogramRuntime;
//!
//! // Auto-loads ferrogram.toml / ferrogram.yaml from the current directory
//! let mut runtime = FerrogramRuntime::new();
//! runtime.on(UpdateKind::Message, |ctx: UpdateContext| async move {
//!     ctx.reply("Hi :)").await.map(drop)
//! });
//! runtime.run().await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use ferrogram_api::TelegramBot;
use ferrogram_core::{
    Bot, BoxedBot, BoxedHandler, BoxedHttpClient, Dispatcher, Handler, HandlerResponse, UpdateContext,
    UpdateKind, into_handler, on,
};
use ferrogram_transport::{BoxedTransport, LongPoller, WebhookTransport};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{
    ConfigLoader, ConfigResult, FerrogramConfig, HttpConfig, UpdatesConfig, validate_config,
};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::mode::UpdateMode;

/// The Ferrogram runtime: configuration, handlers and transport selection.
///
/// # Custom Configuration
///
/// ```rust,ignore
/// let runtime = FerrogramRuntime::builder()
///     .config_file("config/production.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct FerrogramRuntime {
    /// The configuration.
    config: FerrogramConfig,
    /// Handlers moved into the dispatcher on start.
    handlers: Vec<BoxedHandler>,
    /// Outbound client; built from `config.http` when absent.
    client: Option<BoxedHttpClient>,
}

impl FerrogramRuntime {
    /// Creates a runtime from the configuration found in the current
    /// directory, the user config directory and the environment.
    ///
    /// Falls back to defaults if loading fails.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .with_user_config_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                FerrogramConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from configuration and initializes logging.
    ///
    /// In webhook mode (or with an unparseable mode) stdout log output is
    /// moved to stderr.
    pub fn from_config(config: &FerrogramConfig) -> Self {
        let stdio_reserved = config
            .updates
            .mode
            .parse::<UpdateMode>()
            .map_or(true, |mode| mode.uses_stdio());
        logging::init_from_config(&config.logging, stdio_reserved);

        debug!(
            mode = %config.updates.mode,
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            handlers: Vec::new(),
            client: None,
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &FerrogramConfig {
        &self.config
    }

    /// Uses `client` for outbound calls instead of the built-in one.
    pub fn with_client(mut self, client: BoxedHttpClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Registers a handler.
    pub fn register(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Registers an async closure for one update kind.
    pub fn on<F, Fut, R>(&mut self, kind: UpdateKind, f: F) -> &mut Self
    where
        F: Fn(UpdateContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerResponse + 'static,
    {
        self.register(on(kind, f))
    }

    /// Registers an async closure for every update.
    pub fn on_any<F, Fut, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(UpdateContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerResponse + 'static,
    {
        self.register(into_handler(f))
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Runs until the transport finishes or Ctrl+C / SIGTERM is received.
    pub async fn run(self) -> RuntimeResult<()> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until the transport finishes or `shutdown` resolves.
    ///
    /// Mode and configuration are checked before any network call.
    pub async fn run_until<F>(self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let mode: UpdateMode = self.config.updates.mode.parse()?;
        validate_config(&self.config)?;

        let client = match self.client {
            Some(client) => client,
            None => default_client(&self.config.http)?,
        };
        let bot = Arc::new(TelegramBot::new(self.config.bot.to_api_config(), client)?);

        let boxed: BoxedBot = bot.clone();
        let mut dispatcher =
            Dispatcher::new(boxed).require_handlers(self.config.bot.require_handlers);
        for handler in self.handlers {
            dispatcher.register_boxed(handler);
        }
        dispatcher.ensure_ready()?;
        if dispatcher.handler_count() == 0 {
            warn!("No handlers registered, updates will be acknowledged and dropped");
        }
        let dispatcher = Arc::new(dispatcher);

        let transport = select_transport(mode, &self.config.updates, &bot).await?;
        info!(
            mode = %mode,
            transport = transport.name(),
            bot_id = bot.id(),
            handlers = dispatcher.handler_count(),
            "Ferrogram runtime started"
        );

        let token = CancellationToken::new();
        let mut task = transport.run(dispatcher, token.clone());

        tokio::select! {
            result = &mut task => {
                result?;
                info!("Transport finished");
                return Ok(());
            }
            () = shutdown => {
                info!("Shutdown requested, stopping transport");
            }
        }

        token.cancel();
        task.await?;
        info!("Runtime stopped");
        Ok(())
    }
}

impl Default for FerrogramRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FerrogramRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FerrogramRuntime")
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .field("custom_client", &self.client.is_some())
            .finish()
    }
}

// =============================================================================
// Start-up helpers
// =============================================================================

#[cfg(feature = "http-client")]
fn default_client(http: &HttpConfig) -> RuntimeResult<BoxedHttpClient> {
    let client = ferrogram_transport::ReqwestClient::new(&http.to_client_config())?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "http-client"))]
fn default_client(_http: &HttpConfig) -> RuntimeResult<BoxedHttpClient> {
    Err(RuntimeError::NoHttpClient)
}

async fn select_transport(
    mode: UpdateMode,
    updates: &UpdatesConfig,
    bot: &TelegramBot,
) -> RuntimeResult<BoxedTransport> {
    match mode {
        UpdateMode::Webhook => Ok(Box::new(WebhookTransport::stdio())),
        UpdateMode::LongPolling => Ok(Box::new(LongPoller::new(updates.long_poll_config()))),
        UpdateMode::SocketServer => socket_server(updates, bot).await,
    }
}

/// Registers the public webhook URL, if configured, then builds the listener.
#[cfg(feature = "http-server")]
async fn socket_server(updates: &UpdatesConfig, bot: &TelegramBot) -> RuntimeResult<BoxedTransport> {
    let server = &updates.server;

    match &server.webhook_url {
        Some(url) => {
            let reply = bot
                .set_webhook(url, server.secret_token.as_deref(), updates.drop_pending_updates)
                .await?;
            match reply.failure() {
                Some(failure) => warn!(error = %failure, "setWebhook rejected"),
                None => info!(url = %url, "Webhook registered"),
            }
        }
        None if updates.drop_pending_updates => {
            warn!("drop_pending_updates has no effect without updates.server.webhook_url");
        }
        None => {}
    }

    Ok(Box::new(ferrogram_transport::SocketServer::new(
        server.to_server_config(),
    )))
}

#[cfg(not(feature = "http-server"))]
async fn socket_server(_updates: &UpdatesConfig, _bot: &TelegramBot) -> RuntimeResult<BoxedTransport> {
    Err(RuntimeError::ModeUnavailable {
        mode: UpdateMode::SocketServer.as_str(),
        feature: "http-server",
    })
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C, running until the transport stops");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`FerrogramRuntime`] with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder searching the current directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Overrides a single value, e.g. `("updates.mode", "long-polling")`.
    pub fn set(mut self, key: &str, value: impl serde::Serialize) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: FerrogramConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<FerrogramRuntime> {
        let config = self.config_loader.load()?;
        Ok(FerrogramRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

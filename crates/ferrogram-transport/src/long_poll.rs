//! Long-polling transport.
//!
//! Pulls batches with `getUpdates` on a fixed interval. Each batch is handled
//! in ascending `update_id` order; the cursor moves past an update only after
//! every handler of that update has finished.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ferrogram_core::{
    ApiError, Args, Dispatcher, FallbackResponse, Reply, TransportError, TransportResult, Update,
};
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Transport;

/// Long-poll settings.
#[derive(Debug, Clone)]
pub struct LongPollConfig {
    /// Delay between two `getUpdates` calls.
    pub interval: Duration,
    /// Server-side long-poll timeout in seconds (`0` for short polling).
    pub timeout: u64,
    /// Update kinds to receive; empty means the platform default.
    pub allowed_updates: Vec<String>,
    /// Discard updates queued before start-up.
    pub drop_pending_updates: bool,
}

impl Default for LongPollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: 0,
            allowed_updates: Vec::new(),
            drop_pending_updates: false,
        }
    }
}

/// What one poll produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep {
    /// A batch was handled.
    Handled(usize),
    /// The platform rejected the call; wait before the next tick.
    Backoff(Option<Duration>),
}

/// Pull-mode transport with an update cursor.
#[derive(Debug)]
pub struct LongPoller {
    config: LongPollConfig,
    cursor: i64,
}

impl LongPoller {
    /// Creates a poller starting from the platform's oldest pending update.
    pub fn new(config: LongPollConfig) -> Self {
        Self { config, cursor: 0 }
    }

    /// Next `offset` to request: last handled `update_id` + 1.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Removes any webhook so `getUpdates` is allowed.
    pub async fn prepare(&self, dispatcher: &Dispatcher) -> TransportResult<()> {
        let mut args = Args::new();
        if self.config.drop_pending_updates {
            args.insert("drop_pending_updates", true);
        }
        let reply = dispatcher
            .bot()
            .invoke("deleteWebhook", args)
            .await
            .map_err(transport_error)?;
        if let Reply::Failed(failure) = reply {
            warn!(error = %failure, "deleteWebhook rejected, polling anyway");
        }
        Ok(())
    }

    /// Fetches the next batch.
    pub async fn fetch(&self, dispatcher: &Dispatcher) -> TransportResult<Result<Vec<Update>, FallbackResponse>> {
        let mut args = Args::new().with("offset", self.cursor);
        if self.config.timeout > 0 {
            args.insert("timeout", self.config.timeout);
        }
        if !self.config.allowed_updates.is_empty() {
            args.insert("allowed_updates", self.config.allowed_updates.clone());
        }

        let reply = match dispatcher.bot().invoke("getUpdates", args).await {
            Ok(reply) => reply,
            Err(ApiError::Transport(e)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Malformed getUpdates result, skipping batch");
                return Ok(Ok(Vec::new()));
            }
        };

        match reply {
            Reply::Failed(failure) => Ok(Err(failure)),
            Reply::List(entities) => Ok(Ok(entities
                .into_iter()
                .filter_map(|entity| {
                    let update = Update::from_entity(entity);
                    if update.is_none() {
                        debug!("Dropping update without update_id");
                    }
                    update
                })
                .collect())),
            Reply::Entity(entity) => Ok(Ok(Update::from_entity(entity).into_iter().collect())),
            Reply::Scalar(_) => Ok(Ok(Vec::new())),
        }
    }

    /// Dispatches a batch in `update_id` order, advancing the cursor after each.
    pub async fn handle_batch(&mut self, dispatcher: &Dispatcher, mut batch: Vec<Update>) -> usize {
        batch.sort_by_key(Update::id);
        let count = batch.len();
        for update in batch {
            let next = update.id() + 1;
            dispatcher.dispatch(update).await;
            self.cursor = self.cursor.max(next);
        }
        count
    }

    /// One fetch-and-dispatch round.
    pub async fn poll_once(&mut self, dispatcher: &Dispatcher) -> TransportResult<PollStep> {
        match self.fetch(dispatcher).await? {
            Ok(batch) => Ok(PollStep::Handled(self.handle_batch(dispatcher, batch).await)),
            Err(failure) => Ok(backoff(&failure)),
        }
    }

    /// Polls until `shutdown` is cancelled or the transport fails.
    pub async fn poll(&mut self, dispatcher: &Dispatcher, shutdown: &CancellationToken) -> TransportResult<()> {
        self.prepare(dispatcher).await?;
        info!(interval = ?self.config.interval, timeout = self.config.timeout, "Long polling started");

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let fetched = tokio::select! {
                _ = shutdown.cancelled() => break,
                fetched = self.fetch(dispatcher) => fetched?,
            };

            let wait = match fetched {
                Ok(batch) => {
                    let handled = self.handle_batch(dispatcher, batch).await;
                    if handled > 0 {
                        debug!(updates = handled, cursor = self.cursor, "Batch handled");
                    }
                    None
                }
                Err(failure) => match backoff(&failure) {
                    PollStep::Backoff(wait) => wait,
                    PollStep::Handled(_) => None,
                },
            };

            if let Some(wait) = wait {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = sleep(wait) => {}
                }
            }
        }

        info!(cursor = self.cursor, "Long polling stopped");
        Ok(())
    }
}

fn backoff(failure: &FallbackResponse) -> PollStep {
    let wait = failure
        .retry_after()
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs.unsigned_abs()));
    warn!(error = %failure, retry_after = ?wait, "getUpdates rejected");
    PollStep::Backoff(wait)
}

fn transport_error(err: ApiError) -> TransportError {
    match err {
        ApiError::Transport(e) => e,
        other => TransportError::Io(other.to_string()),
    }
}

#[async_trait]
impl Transport for LongPoller {
    fn name(&self) -> &'static str {
        "long-polling"
    }

    async fn run(
        mut self: Box<Self>,
        dispatcher: Arc<Dispatcher>,
        shutdown: CancellationToken,
    ) -> TransportResult<()> {
        self.poll(&dispatcher, &shutdown).await
    }
}

//! Single-shot webhook transport over CGI-style standard streams.
//!
//! The platform's HTTP request is handed to the process by a web server; its
//! body arrives on stdin and the response is written to stdout. The
//! acknowledgement is written and flushed *before* dispatching, so slow
//! handlers never make the platform retry the delivery.

use std::sync::Arc;

use async_trait::async_trait;
use ferrogram_core::{Dispatcher, TransportResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Stdin, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Transport;

/// Reads one update from `input`, acknowledges on `output`, dispatches it.
pub struct WebhookTransport<R, W> {
    input: R,
    output: W,
}

impl WebhookTransport<Stdin, Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> WebhookTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a transport over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Handles the single pending request. Returns the number of handlers run.
    pub async fn handle(mut self, dispatcher: &Dispatcher) -> TransportResult<usize> {
        let mut body = Vec::new();
        self.input.read_to_end(&mut body).await?;
        debug!(len = body.len(), "Webhook request body read");

        self.output.write_all(&acknowledgement()).await?;
        self.output.flush().await?;

        Ok(dispatcher.boot(&body).await)
    }
}

/// Minimal CGI response; the body is a fresh request id.
pub(crate) fn acknowledgement() -> Vec<u8> {
    let id = Uuid::new_v4().to_string();
    format!(
        "Status: 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        id.len(),
        id
    )
    .into_bytes()
}

#[async_trait]
impl<R, W> Transport for WebhookTransport<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn run(
        self: Box<Self>,
        dispatcher: Arc<Dispatcher>,
        _shutdown: CancellationToken,
    ) -> TransportResult<()> {
        let handled = (*self).handle(&dispatcher).await?;
        info!(handlers = handled, "Webhook update handled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBot, recording_dispatcher};
    use std::sync::atomic::Ordering;

    const BODY: &[u8] = br#"{"update_id":10,"message":{"message_id":1,"chat":{"id":5},"text":"hi"}}"#;

    #[tokio::test]
    async fn test_acknowledges_then_dispatches() {
        let (dispatcher, seen, _) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let mut output = Vec::new();

        let handled = WebhookTransport::new(BODY, &mut output)
            .handle(&dispatcher)
            .await
            .unwrap();

        assert_eq!(handled, 1);
        assert_eq!(*seen.lock(), vec![10]);

        let text = String::from_utf8(output).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("Status: 200 OK\r\n"));
        assert!(head.contains("Content-Type: application/json"));
        assert!(head.contains("Connection: close"));
        assert!(head.contains(&format!("Content-Length: {}", body.len())));
        assert!(Uuid::parse_str(body).is_ok());
    }

    #[tokio::test]
    async fn test_same_body_twice_dispatches_twice() {
        let (dispatcher, seen, count) = recording_dispatcher(Arc::new(ScriptedBot::default()));

        for _ in 0..2 {
            let mut output = Vec::new();
            WebhookTransport::new(BODY, &mut output)
                .handle(&dispatcher)
                .await
                .unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(*seen.lock(), vec![10, 10]);
    }

    #[tokio::test]
    async fn test_empty_body_still_acknowledged() {
        let (dispatcher, _, count) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let mut output = Vec::new();

        let handled = WebhookTransport::new(&b""[..], &mut output)
            .handle(&dispatcher)
            .await
            .unwrap();

        assert_eq!(handled, 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(output.starts_with(b"Status: 200 OK"));
    }

    #[test]
    fn test_ack_ids_are_unique() {
        assert_ne!(acknowledgement(), acknowledgement());
    }
}

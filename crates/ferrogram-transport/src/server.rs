//! Socket server transport: the platform pushes updates over HTTP.
//!
//! Every configured host gets its own listener on the shared port. Requests to
//! the configured path pass through [`SecretTokenLayer`] before the body is
//! read; accepted requests are dispatched and answered `200 ok` once all
//! handlers have finished.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use ferrogram_core::{Dispatcher, TransportError, TransportResult};
use futures::future::{BoxFuture, join_all};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};
use tracing::{debug, error, info, trace, warn};

use crate::Transport;

/// Header carrying the shared secret set with `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

// =============================================================================
// Configuration
// =============================================================================

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Hosts to bind, one listener each.
    pub hosts: Vec<String>,
    /// Port shared by all listeners.
    pub port: u16,
    /// Route that receives updates.
    pub path: String,
    /// Expected value of the secret-token header.
    pub secret_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["0.0.0.0".to_string(), "::".to_string()],
            port: 8000,
            path: "/".to_string(),
            secret_token: None,
        }
    }
}

impl ServerConfig {
    /// Route path with a leading slash.
    pub fn normalized_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

// =============================================================================
// Secret token check
// =============================================================================

/// Rejects requests whose secret-token header does not match with `401`.
///
/// Without a configured secret every request passes.
#[derive(Clone)]
pub struct SecretTokenLayer {
    secret: Option<Arc<str>>,
}

impl SecretTokenLayer {
    /// Creates the layer.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }
}

impl<S> Layer<S> for SecretTokenLayer {
    type Service = SecretTokenService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecretTokenService {
            inner,
            secret: self.secret.clone(),
        }
    }
}

/// Service produced by [`SecretTokenLayer`].
#[derive(Clone)]
pub struct SecretTokenService<S> {
    inner: S,
    secret: Option<Arc<str>>,
}

impl<S> SecretTokenService<S> {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret else {
            return true;
        };
        headers
            .get(SECRET_TOKEN_HEADER)
            .is_some_and(|value| constant_time_eq(value.as_bytes(), expected.as_bytes()))
    }
}

impl<S> Service<Request> for SecretTokenService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if !self.authorized(req.headers()) {
            let remote = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string());
            warn!(remote_addr = ?remote, "Rejected update with wrong secret token");
            return Box::pin(async { Ok(StatusCode::UNAUTHORIZED.into_response()) });
        }
        Box::pin(self.inner.call(req))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// =============================================================================
// Server
// =============================================================================

/// Push-mode transport listening for updates.
pub struct SocketServer {
    config: ServerConfig,
}

impl SocketServer {
    /// Creates a server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Builds the router for `dispatcher`.
    pub fn router(&self, dispatcher: Arc<Dispatcher>) -> Router {
        let path = self.config.normalized_path();
        Router::new()
            .route(&path, get(receive_update).post(receive_update))
            .with_state(dispatcher)
            .layer(SecretTokenLayer::new(self.config.secret_token.as_deref()))
    }

    /// Binds one listener per host.
    ///
    /// `AddrInUse` on a later host is tolerated once another host is bound: a
    /// dual-stack `::` socket already covers IPv4 on most systems.
    pub async fn bind(&self) -> TransportResult<Vec<TcpListener>> {
        let mut listeners: Vec<TcpListener> = Vec::new();
        for host in &self.config.hosts {
            let addr = format!("{}:{}", bracket(host), self.config.port);
            match TcpListener::bind((host.as_str(), self.config.port)).await {
                Ok(listener) => listeners.push(listener),
                Err(e) if e.kind() == ErrorKind::AddrInUse && !listeners.is_empty() => {
                    debug!(addr = %addr, "Address already covered by another listener");
                }
                Err(e) => {
                    return Err(TransportError::Bind {
                        addr,
                        reason: e.to_string(),
                    });
                }
            }
        }
        if listeners.is_empty() {
            return Err(TransportError::InvalidConfig("no listen hosts configured".into()));
        }
        Ok(listeners)
    }

    /// Serves until `shutdown` is cancelled, then drains in-flight requests.
    pub async fn serve(&self, dispatcher: Arc<Dispatcher>, shutdown: CancellationToken) -> TransportResult<()> {
        if self.config.secret_token.as_deref().is_none_or(str::is_empty) {
            warn!("No secret token configured, accepting updates from anyone");
        }

        let listeners = self.bind().await?;
        let router = self.router(dispatcher);
        let path = self.config.normalized_path();

        let servers = listeners.into_iter().map(|listener| {
            let router = router.clone();
            let shutdown = shutdown.clone();
            let path = path.clone();
            async move {
                let local = listener.local_addr()?;
                info!(addr = %local, path = %path, "Socket server listening");
                axum::serve(
                    listener,
                    router.into_make_service_with_connect_info::<SocketAddr>(),
                )
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
                .inspect_err(|e| error!(addr = %local, error = %e, "Socket server error"))?;
                info!(addr = %local, "Socket server stopped");
                Ok::<_, TransportError>(())
            }
        });

        join_all(servers).await.into_iter().collect()
    }
}

/// `POST`/`GET` handler: dispatch, then acknowledge.
async fn receive_update(State(dispatcher): State<Arc<Dispatcher>>, body: Bytes) -> impl IntoResponse {
    trace!(len = body.len(), "Update received");
    let handled = dispatcher.boot(&body).await;
    debug!(handlers = handled, "Pushed update handled");
    (StatusCode::OK, "ok")
}

fn bracket(host: &str) -> String {
    if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_string()
    }
}

#[async_trait]
impl Transport for SocketServer {
    fn name(&self) -> &'static str {
        "socket-server"
    }

    async fn run(
        self: Box<Self>,
        dispatcher: Arc<Dispatcher>,
        shutdown: CancellationToken,
    ) -> TransportResult<()> {
        self.serve(dispatcher, shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBot, recording_dispatcher};
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    const BODY: &str = r#"{"update_id":3,"message":{"message_id":1,"chat":{"id":5},"text":"hi"}}"#;

    fn server(secret: Option<&str>) -> SocketServer {
        SocketServer::new(ServerConfig {
            path: "hook".into(),
            secret_token: secret.map(String::from),
            ..Default::default()
        })
    }

    fn request(secret: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/hook");
        if let Some(secret) = secret {
            builder = builder.header("X-Telegram-Bot-Api-Secret-Token", secret);
        }
        builder.body(Body::from(BODY)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_secret_dispatches() {
        let (dispatcher, seen, _) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let router = server(Some("s3cret")).router(dispatcher);

        let response = router.oneshot(request(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"ok");
        assert_eq!(*seen.lock(), vec![3]);
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected_without_dispatch() {
        let (dispatcher, _, count) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let router = server(Some("s3cret")).router(dispatcher);

        let wrong = router.clone().oneshot(request(Some("guess"))).await.unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let missing = router.oneshot(request(None)).await.unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_secret_accepts_all() {
        let (dispatcher, _, count) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let router = server(None).router(dispatcher);

        let response = router.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_and_garbage_answered_ok() {
        let (dispatcher, _, count) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let router = server(None).router(dispatcher);

        let get = HttpRequest::builder().uri("/hook").body(Body::empty()).unwrap();
        assert_eq!(router.clone().oneshot(get).await.unwrap().status(), StatusCode::OK);

        let garbage = HttpRequest::builder()
            .method("POST")
            .uri("/hook")
            .body(Body::from("not json"))
            .unwrap();
        assert_eq!(router.clone().oneshot(garbage).await.unwrap().status(), StatusCode::OK);

        let elsewhere = HttpRequest::builder().uri("/other").body(Body::empty()).unwrap();
        assert_eq!(router.oneshot(elsewhere).await.unwrap().status(), StatusCode::NOT_FOUND);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bind_and_graceful_shutdown() {
        let (dispatcher, _, _) = recording_dispatcher(Arc::new(ScriptedBot::default()));
        let server = SocketServer::new(ServerConfig {
            hosts: vec!["127.0.0.1".into()],
            port: 0,
            ..Default::default()
        });
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        server.serve(dispatcher, shutdown).await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_requires_a_host() {
        let server = SocketServer::new(ServerConfig {
            hosts: Vec::new(),
            ..Default::default()
        });
        assert!(matches!(server.bind().await, Err(TransportError::InvalidConfig(_))));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}

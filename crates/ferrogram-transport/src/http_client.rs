//! reqwest-backed [`HttpClient`].

use std::path::Path;

use async_trait::async_trait;
use ferrogram_core::{
    FormBody, FormPart, HttpClient, HttpClientConfig, HttpResponse, TransportError,
    TransportResult,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response, Url};
use tracing::trace;

/// Shared outbound client enforcing the configured timeouts and body limit.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    body_size_limit: usize,
}

impl ReqwestClient {
    /// Builds a client from `config`.
    pub fn new(config: &HttpClientConfig) -> TransportResult<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.inactivity_timeout)
            .timeout(config.transfer_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            body_size_limit: config.body_size_limit,
        })
    }

    async fn read_body(&self, url: &str, mut response: Response) -> TransportResult<HttpResponse> {
        let status = response.status().as_u16();
        let limit = self.body_size_limit;
        if response.content_length().is_some_and(|len| len as usize > limit) {
            return Err(TransportError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| map_error(url, e))? {
            if body.len() + chunk.len() > limit {
                return Err(TransportError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        trace!(status, bytes = body.len(), "HTTP response read");
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_form(&self, url: &str, form: FormBody) -> TransportResult<HttpResponse> {
        let mut multipart = Form::new();
        for part in form.into_parts() {
            multipart = match part {
                FormPart::Text { name, value } => multipart.text(name, value),
                FormPart::File { name, path } => multipart.part(name, file_part(&path).await?),
            };
        }

        let response = self
            .client
            .post(url)
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| map_error(url, e))?;
        self.read_body(url, response).await
    }

    async fn get(&self, url: &str, query: &[(String, String)]) -> TransportResult<HttpResponse> {
        let target = Url::parse_with_params(url, query)
            .map_err(|e| TransportError::InvalidConfig(format!("invalid URL: {e}")))?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| map_error(url, e))?;
        self.read_body(url, response).await
    }
}

async fn file_part(path: &Path) -> TransportResult<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

fn map_error(url: &str, err: reqwest::Error) -> TransportError {
    let err = err.without_url();
    if err.is_timeout() {
        TransportError::timeout(url)
    } else {
        TransportError::connection(url, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> ReqwestClient {
        ReqwestClient::new(
            &HttpClientConfig::default()
                .with_connect_timeout(Duration::from_secs(2))
                .with_body_size_limit(16),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        let err = client()
            .post_form("http://127.0.0.1:1/bot1:x/getMe", FormBody::new().text("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionFailed { .. } | TransportError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let err = client().get("not a url", &[]).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let form = FormBody::new().file("photo", "/definitely/not/here.png");
        let err = client().post_form("http://127.0.0.1:1/", form).await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[cfg(feature = "http-server")]
    #[tokio::test]
    async fn test_body_limit_and_status_passthrough() {
        use axum::{Router, http::StatusCode, routing::get};

        let app = Router::new()
            .route("/small", get(|| async { (StatusCode::BAD_REQUEST, "{\"ok\":false}") }))
            .route("/large", get(|| async { "x".repeat(64) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = client();
        let small = client.get(&format!("http://{addr}/small"), &[]).await.unwrap();
        assert_eq!(small.status, 400);
        assert_eq!(small.body, b"{\"ok\":false}");

        let large = client.get(&format!("http://{addr}/large"), &[]).await.unwrap_err();
        assert!(matches!(large, TransportError::BodyTooLarge { limit: 16 }));
    }
}

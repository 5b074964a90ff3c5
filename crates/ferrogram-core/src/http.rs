//! Outbound HTTP seam.
//!
//! The RPC proxy builds a transport-neutral [`FormBody`] and hands it to an
//! [`HttpClient`]. `ferrogram-transport` provides the reqwest implementation;
//! tests substitute in-memory fakes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportResult;

// =============================================================================
// Request body
// =============================================================================

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain form field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File upload read from a local path.
    File {
        /// Field name.
        name: String,
        /// Path of the file to attach.
        path: PathBuf,
    },
}

impl FormPart {
    /// Field name of this part.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// A multipart form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    parts: Vec<FormPart>,
}

impl FormBody {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a file part.
    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// Returns the parts in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Consumes the form, returning its parts.
    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    /// Returns `true` if the form has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Status and fully buffered body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

// =============================================================================
// Client
// =============================================================================

/// Shared outbound HTTP client.
///
/// Non-2xx responses are **not** errors: the platform reports failures in the
/// JSON body, which the caller must still decode.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a multipart POST.
    async fn post_form(&self, url: &str, form: FormBody) -> TransportResult<HttpResponse>;

    /// Sends a GET with query parameters.
    async fn get(&self, url: &str, query: &[(String, String)]) -> TransportResult<HttpResponse>;
}

/// Shared handle to an HTTP client.
pub type BoxedHttpClient = Arc<dyn HttpClient>;

// =============================================================================
// Client configuration
// =============================================================================

/// Per-request limits applied by the outbound client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Longest pause allowed between two reads.
    pub inactivity_timeout: Duration,
    /// Total time allowed for one request, body included.
    pub transfer_timeout: Duration,
    /// Largest accepted response body, in bytes.
    pub body_size_limit: usize,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            inactivity_timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(60),
            body_size_limit: 10_000_000,
            user_agent: concat!("ferrogram/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the inactivity timeout.
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    /// Sets the transfer timeout.
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    /// Sets the response body limit in bytes.
    pub fn with_body_size_limit(mut self, limit: usize) -> Self {
        self.body_size_limit = limit;
        self
    }
}

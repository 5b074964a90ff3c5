//! HTTP implementation of [`Bot`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use ferrogram_api::{ApiConfig, TelegramBot};
//!
//! let bot = TelegramBot::new(ApiConfig::new(token), client)?;
//!
//! // Any method name works; mapped ones come back typed.
//! let reply = bot.invoke("sendMessage", Args::new().with("chat_id", 1).with("text", "hi")).await?;
//! match reply {
//!     Reply::Entity(message) => println!("sent {:?}", message.int("message_id")),
//!     Reply::Failed(failure) => println!("rejected: {failure}"),
//!     _ => {}
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use ferrogram_core::{
    ApiError, ApiResult, Args, Bot, BoxedHttpClient, Entity, FallbackResponse, GENERIC, Reply,
};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::request::{Verb, build_form, build_query, normalize};
use crate::responses::response_shape;

// =============================================================================
// TelegramBot
// =============================================================================

/// RPC proxy that sends every call as an HTTP request to the platform.
pub struct TelegramBot {
    /// Bot id (token prefix).
    id: String,
    token: String,
    api_url: String,
    default_params: Map<String, Value>,
    client: BoxedHttpClient,
}

impl TelegramBot {
    /// Creates a bot from its configuration and a shared HTTP client.
    ///
    /// Fails when the token is not of the form `<digits>:<secret>`.
    pub fn new(config: ApiConfig, client: BoxedHttpClient) -> ApiResult<Self> {
        let id = parse_token(&config.token)?;
        Ok(Self {
            id,
            token: config.token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            default_params: config.default_params,
            client,
        })
    }

    /// Full URL of `method`. Absolute `http(s)://` names are used verbatim.
    pub fn method_url(&self, method: &str) -> String {
        if method.starts_with("http://") || method.starts_with("https://") {
            method.to_string()
        } else {
            format!("{}/bot{}/{}", self.api_url, self.token, method)
        }
    }

    /// Invokes `method` with an explicit verb.
    pub async fn call(&self, verb: Verb, method: &str, args: Args) -> ApiResult<Reply> {
        let url = self.method_url(method);
        let args = normalize(args, &self.default_params);
        debug!(bot_id = %self.id, method = %method, ?verb, args = args.len(), "Invoking API method");

        let response = match verb {
            Verb::Post => {
                let form = build_form(args).await;
                self.client.post_form(&url, form).await
            }
            Verb::Get => self.client.get(&url, &build_query(args)).await,
        }
        .map_err(|e| e.redact(&self.token))?;

        trace!(method = %method, status = response.status, bytes = response.body.len(), "API response");
        let reply = decode_reply(method, &response.body)?;
        if let Reply::Failed(failure) = &reply {
            debug!(
                method = %method,
                error_code = ?failure.error_code(),
                description = ?failure.description(),
                "Platform rejected call"
            );
        }
        Ok(reply)
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// `getMe`.
    pub async fn get_me(&self) -> ApiResult<Reply> {
        self.invoke("getMe", Args::new()).await
    }

    /// `sendMessage`.
    pub async fn send_message(
        &self,
        chat_id: impl Into<Value>,
        text: impl Into<String>,
    ) -> ApiResult<Reply> {
        let args = Args::new().with("chat_id", chat_id).with("text", text.into());
        self.invoke("sendMessage", args).await
    }

    /// `editMessageText`.
    pub async fn edit_message_text(
        &self,
        chat_id: impl Into<Value>,
        message_id: i64,
        text: impl Into<String>,
    ) -> ApiResult<Reply> {
        let args = Args::new()
            .with("chat_id", chat_id)
            .with("message_id", message_id)
            .with("text", text.into());
        self.invoke("editMessageText", args).await
    }

    /// `deleteMessage`.
    pub async fn delete_message(&self, chat_id: impl Into<Value>, message_id: i64) -> ApiResult<Reply> {
        let args = Args::new().with("chat_id", chat_id).with("message_id", message_id);
        self.invoke("deleteMessage", args).await
    }

    /// `answerCallbackQuery`.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> ApiResult<Reply> {
        let mut args = Args::new().with("callback_query_id", callback_query_id);
        if let Some(text) = text {
            args.insert("text", text);
        }
        self.invoke("answerCallbackQuery", args).await
    }

    /// `getUpdates` starting at `offset`, long-polling for `timeout` seconds.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: u64,
        allowed_updates: &[String],
    ) -> ApiResult<Reply> {
        let args = Args::new()
            .with("offset", offset)
            .with("timeout", timeout)
            .with("allowed_updates", allowed_updates.to_vec());
        self.invoke("getUpdates", args).await
    }

    /// `setWebhook`.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
        drop_pending_updates: bool,
    ) -> ApiResult<Reply> {
        let mut args = Args::new()
            .with("url", url)
            .with("drop_pending_updates", drop_pending_updates);
        if let Some(secret) = secret_token {
            args.insert("secret_token", secret);
        }
        self.invoke("setWebhook", args).await
    }

    /// `deleteWebhook`.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> ApiResult<Reply> {
        let args = Args::new().with("drop_pending_updates", drop_pending_updates);
        self.invoke("deleteWebhook", args).await
    }

    /// `getWebhookInfo`.
    pub async fn get_webhook_info(&self) -> ApiResult<Reply> {
        self.invoke("getWebhookInfo", Args::new()).await
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("id", &self.id)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Bot Trait Implementation
// =============================================================================

#[async_trait]
impl Bot for TelegramBot {
    fn id(&self) -> &str {
        &self.id
    }

    async fn invoke(&self, method: &str, args: Args) -> ApiResult<Reply> {
        self.call(Verb::Post, method, args).await
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_token(token: &str) -> ApiResult<String> {
    let Some((id, secret)) = token.split_once(':') else {
        return Err(ApiError::InvalidToken("missing ':' separator".into()));
    };
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidToken("bot id must be numeric".into()));
    }
    if secret.is_empty() {
        return Err(ApiError::InvalidToken("secret part is empty".into()));
    }
    Ok(id.to_string())
}

/// Maps a raw response body to a [`Reply`].
pub(crate) fn decode_reply(method: &str, body: &[u8]) -> ApiResult<Reply> {
    let envelope = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Ok(Reply::Failed(FallbackResponse::undecodable(format!(
                "expected object, found {}",
                ferrogram_core::entity::coerce::kind_of(&other)
            ))));
        }
        Err(e) => return Ok(Reply::Failed(FallbackResponse::undecodable(e))),
    };

    if envelope.get("ok") != Some(&Value::Bool(true)) {
        return Ok(Reply::Failed(FallbackResponse::new(envelope)));
    }

    let mut envelope = envelope;
    let result = envelope.remove("result").unwrap_or(Value::Null);
    let schema = response_shape(method).map_or(&GENERIC, |shape| shape.schema());

    Ok(match result {
        Value::Array(items) if items.iter().all(Value::is_object) => Reply::List(
            items
                .into_iter()
                .map(|item| Entity::from_value(schema, item))
                .collect::<Result<_, _>>()?,
        ),
        object @ Value::Object(_) => Reply::Entity(Entity::from_value(schema, object)?),
        scalar => Reply::Scalar(scalar),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrogram_core::types::{MESSAGE, UPDATE};
    use ferrogram_core::{
        FormBody, FormPart, HttpClient, HttpResponse, TransportError,
        TransportResult,
    };
    use parking_lot::Mutex;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every request with a fixed body and records what was sent.
    struct MockHttp {
        body: Vec<u8>,
        fail: bool,
        calls: AtomicUsize,
        forms: Mutex<Vec<(String, FormBody)>>,
        queries: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockHttp {
        fn new(body: Vec<u8>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                body,
                fail,
                calls: AtomicUsize::new(0),
                forms: Mutex::new(Vec::new()),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn answering(body: Value) -> Arc<Self> {
            Self::new(body.to_string().into_bytes(), false)
        }

        fn raw(body: &str) -> Arc<Self> {
            Self::new(body.as_bytes().to_vec(), false)
        }

        fn failing() -> Arc<Self> {
            Self::new(Vec::new(), true)
        }

        fn respond(&self, url: &str) -> TransportResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TransportError::connection(url, "connection refused"));
            }
            Ok(HttpResponse {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    #[async_trait]
    impl HttpClient for MockHttp {
        async fn post_form(&self, url: &str, form: FormBody) -> TransportResult<HttpResponse> {
            self.forms.lock().push((url.to_string(), form));
            self.respond(url)
        }

        async fn get(&self, url: &str, query: &[(String, String)]) -> TransportResult<HttpResponse> {
            self.queries.lock().push((url.to_string(), query.to_vec()));
            self.respond(url)
        }
    }

    fn bot(http: &Arc<MockHttp>) -> TelegramBot {
        TelegramBot::new(ApiConfig::new("123:secret"), http.clone()).unwrap()
    }

    #[test]
    fn test_token_validation() {
        let http = MockHttp::answering(json!({}));
        assert!(TelegramBot::new(ApiConfig::new("123:abc"), http.clone()).is_ok());
        for bad in ["", "123", "abc:def", ":def", "123:"] {
            assert!(
                matches!(
                    TelegramBot::new(ApiConfig::new(bad), http.clone()),
                    Err(ApiError::InvalidToken(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(bot(&http).id(), "123");
    }

    #[test]
    fn test_method_url() {
        let http = MockHttp::answering(json!({}));
        let config = ApiConfig::new("123:secret").with_api_url("http://localhost:8081/");
        let bot = TelegramBot::new(config, http).unwrap();
        assert_eq!(bot.method_url("getMe"), "http://localhost:8081/bot123:secret/getMe");
        assert_eq!(bot.method_url("https://example.org/x"), "https://example.org/x");
    }

    #[tokio::test]
    async fn test_send_message_maps_to_message() {
        let http = MockHttp::answering(json!({
            "ok": true,
            "result": {"message_id": 42, "text": "hi", "chat": {"id": 1, "type": "private"}}
        }));
        let bot = bot(&http);

        let reply = bot
            .invoke("sendMessage", Args::new().with("chat_id", 1).with("text", "hi"))
            .await
            .unwrap();
        let message = reply.into_entity().unwrap();
        assert!(message.is(&MESSAGE));
        assert_eq!(message.int("message_id"), Some(42));
        assert_eq!(message.entity("chat").unwrap().unwrap().int("id"), Some(1));

        let forms = http.forms.lock();
        assert_eq!(forms[0].0, "https://api.telegram.org/bot123:secret/sendMessage");
        let names: Vec<_> = forms[0].1.parts().iter().map(FormPart::name).collect();
        assert_eq!(names, vec!["chat_id", "text"]);
    }

    #[tokio::test]
    async fn test_rate_limit_is_fallback() {
        let http = MockHttp::answering(json!({
            "ok": false, "error_code": 429, "description": "Too Many Requests", "retry_after": 3
        }));
        let reply = bot(&http)
            .invoke("sendMessage", Args::new().with("chat_id", 1).with("text", "hi"))
            .await
            .unwrap();
        let failure = reply.failure().unwrap();
        assert_eq!(failure.retry_after(), Some(3));
        assert_eq!(failure.error_code(), Some(429));
        assert!(!reply.is_ok());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_fallback() {
        let http = MockHttp::raw("<html>bad gateway</html>");
        let reply = bot(&http).get_me().await.unwrap();
        let failure = reply.failure().unwrap();
        assert!(!failure.ok());
        assert!(failure.description().unwrap().contains("undecodable"));
    }

    #[tokio::test]
    async fn test_scalar_and_unknown_results() {
        let http = MockHttp::answering(json!({"ok": true, "result": true}));
        let reply = bot(&http).delete_message(1, 2).await.unwrap();
        assert_eq!(reply.scalar(), Some(&Value::Bool(true)));

        let http = MockHttp::answering(json!({"ok": true, "result": {"foo": "bar"}}));
        let reply = bot(&http).invoke("someFutureMethod", Args::new()).await.unwrap();
        let entity = reply.into_entity().unwrap();
        assert_eq!(entity.name(), GENERIC.name);
        assert_eq!(entity.string("foo").as_deref(), Some("bar"));
        assert!(http.forms.lock()[0].0.ends_with("/someFutureMethod"));
    }

    #[tokio::test]
    async fn test_list_results() {
        let http = MockHttp::answering(json!({"ok": true, "result": [
            {"update_id": 2, "message": {"message_id": 1}},
            {"update_id": 1, "message": {"message_id": 2}}
        ]}));
        let updates = bot(&http)
            .get_updates(0, 30, &["message".to_string()])
            .await
            .unwrap()
            .into_list()
            .unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.is(&UPDATE)));

        let http = MockHttp::answering(json!({"ok": true, "result": []}));
        let reply = bot(&http).invoke("getUpdates", Args::new()).await.unwrap();
        assert_eq!(reply.into_list().map(|l| l.len()), Some(0));
    }

    #[tokio::test]
    async fn test_array_of_scalars_returned_as_is() {
        let http = MockHttp::answering(json!({"ok": true, "result": [1, 2]}));
        let reply = bot(&http).invoke("getUpdates", Args::new()).await.unwrap();
        assert_eq!(reply.scalar(), Some(&json!([1, 2])));

        let http = MockHttp::answering(json!({"ok": true, "result": [{"update_id": 1}, "x"]}));
        let reply = bot(&http).invoke("getUpdates", Args::new()).await.unwrap();
        assert_eq!(reply.scalar(), Some(&json!([{"update_id": 1}, "x"])));
    }

    #[tokio::test]
    async fn test_falsy_args_dropped_and_defaults_applied() {
        let http = MockHttp::answering(json!({"ok": true, "result": true}));
        let config = ApiConfig::new("123:secret").with_default_param("parse_mode", "HTML");
        let bot = TelegramBot::new(config, http.clone()).unwrap();

        bot.invoke(
            "sendMessage",
            Args::new()
                .with("chat_id", 7)
                .with("text", "hi")
                .with("reply_markup", json!({}))
                .with("disable_notification", false)
                .with("message_thread_id", 0),
        )
        .await
        .unwrap();

        let forms = http.forms.lock();
        let mut names: Vec<_> = forms[0].1.parts().iter().map(FormPart::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["chat_id", "parse_mode", "text"]);
    }

    #[tokio::test]
    async fn test_file_argument_attached() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"png").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let http = MockHttp::answering(json!({"ok": true, "result": {"message_id": 1}}));
        bot(&http)
            .invoke("sendPhoto", Args::new().with("chat_id", 1).with("photo", path))
            .await
            .unwrap();

        let forms = http.forms.lock();
        assert!(forms[0]
            .1
            .parts()
            .iter()
            .any(|p| matches!(p, FormPart::File { name, .. } if name == "photo")));
    }

    #[tokio::test]
    async fn test_get_verb_uses_query() {
        let http = MockHttp::answering(json!({"ok": true, "result": {"id": 123, "is_bot": true}}));
        let reply = bot(&http)
            .call(Verb::Get, "getMe", Args::new().with("x", 1))
            .await
            .unwrap();
        assert_eq!(reply.as_entity().unwrap().name(), "User");
        assert!(http.forms.lock().is_empty());
        assert_eq!(http.queries.lock()[0].1, vec![("x".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let http = MockHttp::failing();
        let err = bot(&http).get_me().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.to_string().contains("secret"));
        assert_eq!(http.calls.load(Ordering::SeqCst), 1);
    }
}

//! HTTP gateway
//!
//! Every backend call goes through [`HttpGateway::call`]: it attaches the
//! bearer credential, sends exactly one request and classifies the response
//! into [`CareLinkError`]. A 401/403 also fires the process-wide unauthorized
//! hook unless the request opted out (login and registration do).

use std::sync::Arc;
use std::time::Duration;

use carelink_core::{AccessTokenProvider, UnauthorizedHook};
use carelink_domain::constants::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use carelink_domain::{ApiConfig, CareLinkError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, GET by default.
    pub method: Method,
    /// JSON body. Nothing is sent when absent.
    pub body: Option<Value>,
    /// Do not fire the unauthorized hook on 401/403.
    pub skip_auth_handling: bool,
}

impl RequestOptions {
    /// Plain GET.
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with a serialized JSON body.
    pub fn post<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| CareLinkError::Internal(format!("failed to serialize body: {e}")))?;
        Ok(Self { method: Method::POST, body: Some(body), skip_auth_handling: false })
    }

    /// Leave 401/403 to the caller instead of raising the unauthorized signal.
    pub fn skip_auth_handling(mut self) -> Self {
        self.skip_auth_handling = true;
        self
    }
}

/// Credential-aware HTTP gateway
#[derive(Clone)]
pub struct HttpGateway {
    client: ReqwestClient,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
    unauthorized: Arc<UnauthorizedHook>,
}

impl HttpGateway {
    /// Start building a new gateway.
    pub fn builder() -> HttpGatewayBuilder {
        HttpGatewayBuilder::default()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Hook fired on credential rejection.
    pub fn unauthorized_hook(&self) -> &Arc<UnauthorizedHook> {
        &self.unauthorized
    }

    /// Perform one request and decode the JSON response.
    ///
    /// 204/205 and empty bodies decode as JSON `null`.
    ///
    /// # Errors
    ///
    /// - `TransientNetwork` when no response was received
    /// - `Authorization`, `Validation` or `Server` for non-2xx statuses
    /// - `Decode` when the body does not match `T`
    #[instrument(skip(self, options), fields(method = %options.method, path = %path))]
    pub async fn call<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request =
            self.client.request(options.method.clone(), &url).header(ACCEPT, "application/json");
        let token = self.tokens.access_token();
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        debug!(url = %url, "dispatching request");
        let response = request.send().await.map_err(|e| CareLinkError::from(InfraError::from(e)))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| CareLinkError::from(InfraError::from(e)))?;
        debug!(%status, bytes = body.len(), "received response");

        if !status.is_success() {
            let message = extract_message(&body)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            let err = CareLinkError::from_status(status.as_u16(), message);
            if err.is_authorization() && !options.skip_auth_handling {
                warn!(%status, "credential rejected; raising unauthorized signal");
                self.unauthorized.fire(token.as_deref());
            }
            return Err(err);
        }

        decode_body(status, &body)
    }

    /// GET `path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(path, RequestOptions::get()).await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(path, RequestOptions::post(body)?).await
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    let no_content = status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT;
    if no_content || body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null).map_err(|_| {
            CareLinkError::Decode(format!(
                "empty response ({}) cannot be decoded into the expected type",
                status.as_u16()
            ))
        });
    }
    serde_json::from_slice(body).map_err(|e| CareLinkError::Decode(e.to_string()))
}

/// Best-effort error message from a JSON error payload.
///
/// Looks at `detail` (string, or list of `{ msg }`), then `message`, then
/// `error`.
fn extract_message(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;

    match payload.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.trim().is_empty())
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    ["message", "error"].iter().find_map(|key| {
        payload.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty()).map(str::to_string)
    })
}

/// Builder for [`HttpGateway`].
pub struct HttpGatewayBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: String,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    unauthorized: Option<Arc<UnauthorizedHook>>,
}

impl Default for HttpGatewayBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            tokens: None,
            unauthorized: None,
        }
    }
}

impl HttpGatewayBuilder {
    /// Absolute http(s) base URL. Required.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Base URL, timeout and user agent from [`ApiConfig`].
    pub fn api_config(self, config: &ApiConfig) -> Self {
        self.base_url(config.base_url.clone())
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
    }

    /// Source of the bearer credential. Required.
    pub fn tokens(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Hook to fire on 401/403. A fresh one is used when unset.
    pub fn unauthorized_hook(mut self, hook: Arc<UnauthorizedHook>) -> Self {
        self.unauthorized = Some(hook);
        self
    }

    /// Build the gateway.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the base URL or token provider is missing or the
    /// base URL is not an absolute http(s) URL.
    pub fn build(self) -> Result<HttpGateway> {
        let base_url = self
            .base_url
            .ok_or_else(|| CareLinkError::Config("API base URL not set".to_string()))?;
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| CareLinkError::Config(format!("invalid API base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CareLinkError::Config(format!(
                "API base URL must use http or https: {base_url}"
            )));
        }
        let tokens =
            self.tokens.ok_or_else(|| CareLinkError::Config("token provider not set".to_string()))?;

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(|e| CareLinkError::from(InfraError::from(e)))?;

        Ok(HttpGateway {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            unauthorized: self.unauthorized.unwrap_or_default(),
        })
    }
}

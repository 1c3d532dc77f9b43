//! HTTP client with bearer-token injection and response normalization.
//!
//! Every dispatch reads the session token fresh, attaches it as a bearer
//! header, and folds the response into `Result<Option<T>, ApiError>`:
//! `Some` for a decoded body, `None` for no-content, `Err` for failures.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::request::ApiRequest;
use super::transport::{HttpTransport, OutgoingRequest, RawResponse, Transport, TransportError};
use crate::config::ApiConfig;
use crate::session::Session;

/// Client for the blog backend API.
///
/// Holds the base URL, the session context and the wire transport.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    session: Session,
    default_timeout: Option<std::time::Duration>,
}

impl ApiClient<HttpTransport> {
    /// Create a client over HTTP using the configured base URL.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let transport = HttpTransport::new().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::configured(config, session, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Client over `transport` with the configured base URL and default deadline.
    pub fn configured(config: &ApiConfig, session: Session, transport: T) -> Self {
        let mut client = Self::with_transport(&config.base_url, session, transport);
        client.default_timeout = config.timeout;
        client
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(base_url: &str, session: Session, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            default_timeout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and normalize the outcome.
    ///
    /// Returns `Ok(None)` for 204 and `Content-Length: 0` responses.
    /// Failures are logged with the endpoint before they are returned.
    pub async fn dispatch<R: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Option<R>, ApiError> {
        let result = self.dispatch_inner(request).await;
        if let Err(ref e) = result {
            log::error!("API request failed: {}: {}", request.endpoint(), e);
        }
        result
    }

    /// Like [`dispatch`](Self::dispatch) but treats a no-content outcome as an error.
    pub async fn fetch<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R, ApiError> {
        self.dispatch(request)
            .await?
            .ok_or_else(|| ApiError::EmptyBody {
                endpoint: request.endpoint().to_string(),
            })
    }

    async fn dispatch_inner<R: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Option<R>, ApiError> {
        let outgoing = self.prepare(request);
        log::debug!("{} {}", outgoing.method, outgoing.url);

        let send = self.transport.send(outgoing);
        let timeout = request.timeout_duration().or(self.default_timeout);

        let settled = match (request.cancel_token(), timeout) {
            (Some(token), Some(limit)) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ApiError::Cancelled),
                r = tokio::time::timeout(limit, send) => r.map_err(|_| ApiError::Timeout(limit))?,
            },
            (Some(token), None) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ApiError::Cancelled),
                r = send => r,
            },
            (None, Some(limit)) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| ApiError::Timeout(limit))?,
            (None, None) => send.await,
        };

        let response = settled.map_err(|e| match e {
            TransportError::Unreachable(cause) => ApiError::NetworkUnreachable { cause },
            TransportError::Other(msg) => ApiError::Transport(msg),
        })?;

        interpret(response)
    }

    /// Build the outgoing request: JSON content type, bearer token, then
    /// caller overrides on top.
    fn prepare(&self, request: &ApiRequest) -> OutgoingRequest {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self.session.token() {
            Ok(Some(token)) => match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => log::warn!("Stored session token is not a valid header value, skipping"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read session token: {}", e),
        }

        for (name, value) in request.headers() {
            headers.insert(name.clone(), value.clone());
        }

        OutgoingRequest {
            method: request.method().clone(),
            url: format!("{}{}", self.base_url, request.endpoint()),
            headers,
            body: request.body().map(str::to_string),
        }
    }
}

pub(crate) fn interpret<R: DeserializeOwned>(response: RawResponse) -> Result<Option<R>, ApiError> {
    if response.status == 204 {
        return Ok(None);
    }

    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            message: error_message(&response),
        });
    }

    if response.header("content-length") == Some("0") {
        return Ok(None);
    }

    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(|source| ApiError::Parse { source })
}

fn error_message(response: &RawResponse) -> String {
    let fallback = || format!("API request failed with status {}", response.status);
    let status_text = || {
        if response.status_text.is_empty() {
            fallback()
        } else {
            response.status_text.clone()
        }
    };

    if response.body.is_empty() {
        return status_text();
    }
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(body) => match body.get("message").and_then(Value::as_str) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback(),
        },
        Err(_) => status_text(),
    }
}

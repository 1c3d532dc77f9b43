//! Wire transport for prepared requests.
//!
//! [`Transport`] is the seam between response normalization and the network:
//! [`HttpTransport`] sends over `reqwest`, tests substitute a recording mock.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use thiserror::Error;

/// A fully prepared request: absolute URL and final headers.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// A settled response with its body already read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Reason phrase for `status`; empty when the code has none.
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of a response header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// No connection could be made (refused, DNS, unreachable host).
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

/// Sends a prepared request and returns the settled response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport with a cookie store, so cross-origin
/// credentials travel with every call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::build(Client::builder())
    }

    /// Transport that ignores proxy settings from the environment.
    #[cfg(test)]
    pub(crate) fn direct() -> Result<Self, TransportError> {
        Self::build(Client::builder().no_proxy())
    }

    fn build(builder: reqwest::ClientBuilder) -> Result<Self, TransportError> {
        let client = builder
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(classify)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
        })
    }
}

/// Connection-level failures become `Unreachable`; anything else is `Other`.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || (err.is_request() && err.status().is_none() && !err.is_builder()) {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

//! Test transports shared by the API unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::header::{HeaderMap, HeaderValue};

use super::client::ApiClient;
use super::transport::{OutgoingRequest, RawResponse, Transport, TransportError};
use crate::session::Session;

/// Replays scripted responses in order and records every request.
/// The final response repeats once the script runs out.
pub struct Scripted {
    script: Mutex<VecDeque<Result<RawResponse, String>>>,
    seen: Mutex<Vec<OutgoingRequest>>,
}

impl Scripted {
    pub fn new(response: RawResponse) -> Self {
        Self::sequence(vec![Ok(response)])
    }

    pub fn unreachable(cause: &str) -> Self {
        Self::sequence(vec![Err(cause.to_string())])
    }

    pub fn sequence(script: Vec<Result<RawResponse, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn last(&self) -> OutgoingRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for Scripted {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        };
        next.map_err(TransportError::Unreachable)
    }
}

/// Never settles.
pub struct Hang;

impl Transport for Hang {
    async fn send(&self, _request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        std::future::pending().await
    }
}

pub fn response(status: u16, status_text: &str, body: &str) -> RawResponse {
    RawResponse {
        status,
        status_text: status_text.to_string(),
        headers: HeaderMap::new(),
        body: body.as_bytes().to_vec(),
    }
}

pub fn json_response(body: serde_json::Value) -> RawResponse {
    let mut resp = response(200, "OK", &body.to_string());
    resp.headers
        .insert("content-type", HeaderValue::from_static("application/json"));
    resp
}

pub fn no_content() -> RawResponse {
    response(204, "No Content", "")
}

pub fn client<T: Transport>(transport: T) -> ApiClient<T> {
    ApiClient::with_transport("http://api.test/api/", Session::in_memory(), transport)
}

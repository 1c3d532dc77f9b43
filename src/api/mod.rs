//! API access layer for the blog backend.
//!
//! Provides request dispatch with bearer-token injection, response
//! normalization, a mock-response path with its selection policy, and typed
//! wrappers for the backend endpoints.

pub mod auth;
pub mod blogs;
pub mod client;
pub mod error;
pub mod mock;
pub mod posts;
pub mod request;
pub mod transport;
pub mod types;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use error::ApiError;
pub use mock::{mock_dispatch, should_use_mock, MockPolicy};
pub use request::ApiRequest;
pub use transport::{HttpTransport, Transport};

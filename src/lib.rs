//! Client access layer for the blog platform backend.
//!
//! - [`api`]: request dispatch, auth injection, error normalization, mock policy
//! - [`session`]: session context (token and user record) over a persistent store
//! - [`dashboard`]: mock-or-live data access used by the dashboard views
//! - [`config`]: environment configuration

pub mod api;
pub mod config;
pub mod dashboard;
pub mod fixtures;
pub mod session;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use config::ApiConfig;
pub use session::Session;

//! Profile and password settings (`/users`).

use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::transport::Transport;
use super::types::{PasswordUpdateRequest, ProfileUpdate, User};

pub async fn profile<T: Transport>(client: &ApiClient<T>) -> Result<User, ApiError> {
    client.fetch(&ApiRequest::get("/users/profile")).await
}

/// PUT /users/profile. Returns the updated user when the backend sends one.
pub async fn update_profile<T: Transport>(
    client: &ApiClient<T>,
    update: &ProfileUpdate,
) -> Result<Option<User>, ApiError> {
    client
        .dispatch(&ApiRequest::put("/users/profile").json(update)?)
        .await
}

pub async fn update_password<T: Transport>(
    client: &ApiClient<T>,
    current_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::put("/users/password").json(&PasswordUpdateRequest {
        current_password: current_password.to_string(),
        new_password: new_password.to_string(),
    })?;
    client.dispatch::<serde_json::Value>(&request).await?;
    Ok(())
}

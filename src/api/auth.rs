//! Login, signup and logout.
//!
//! A successful login or signup begins the client's session (token plus
//! user record), so every later dispatch is authenticated automatically.

use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::transport::Transport;
use super::types::{AuthResponse, LoginRequest, SignupRequest, User};

/// POST /auth/login, then store the returned token and user.
pub async fn login<T: Transport>(
    client: &ApiClient<T>,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let request = ApiRequest::post("/auth/login").json(&LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let resp: AuthResponse = client.fetch(&request).await?;
    start_session(client, resp)
}

/// POST /auth/signup, then store the returned token and user.
pub async fn signup<T: Transport>(
    client: &ApiClient<T>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let request = ApiRequest::post("/auth/signup").json(&SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let resp: AuthResponse = client.fetch(&request).await?;
    start_session(client, resp)
}

/// Clear the local session. The backend is stateless, so no call is made.
pub fn logout<T: Transport>(client: &ApiClient<T>) -> Result<(), ApiError> {
    client.session().end()?;
    Ok(())
}

fn start_session<T: Transport>(
    client: &ApiClient<T>,
    resp: AuthResponse,
) -> Result<User, ApiError> {
    client.session().begin(&resp.token, &resp.user)?;
    log::info!("Logged in as user {}", resp.user.id);
    Ok(resp.user)
}

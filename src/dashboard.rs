//! Dashboard data access with mock fallback.
//!
//! Chooses between live calls and demo data per call via [`MockPolicy`],
//! starts a demo session on a local host with no token, and keeps the
//! stored user record in step with profile changes.

use serde_json::Value;

use crate::api::mock::{mock_dispatch, MockPolicy};
use crate::api::transport::Transport;
use crate::api::types::{Blog, ProfileUpdate, User};
use crate::api::{blogs, users, ApiClient, ApiError};
use crate::fixtures;
use crate::session::SessionError;

/// Host on which a missing session is replaced by the demo session.
const DEMO_HOST: &str = "localhost";

pub struct Dashboard<'a, T: Transport> {
    client: &'a ApiClient<T>,
    policy: &'a MockPolicy,
}

impl<'a, T: Transport> Dashboard<'a, T> {
    pub fn new(client: &'a ApiClient<T>, policy: &'a MockPolicy) -> Self {
        Self { client, policy }
    }

    /// Make sure a session exists before the dashboard is used.
    ///
    /// With no stored token on the local host, starts the demo session
    /// (`mock-jwt-token` and the demo user). Returns `false` when there is
    /// still no session and the caller has to log in.
    pub fn ensure_session(&self) -> Result<bool, ApiError> {
        let session = self.client.session();
        if session.is_authenticated()? {
            return Ok(true);
        }
        if self.policy.host_name().as_deref() != Some(DEMO_HOST) {
            return Ok(false);
        }
        session.begin(fixtures::DEMO_TOKEN, &fixtures::demo_user())?;
        log::info!("Started demo session on {}", DEMO_HOST);
        Ok(true)
    }

    /// Blogs for the dashboard. A failed live call serves the demo blogs.
    pub async fn posts(&self) -> Result<Vec<Blog>, ApiError> {
        if self.policy.should_use_mock() {
            return Ok(mock_dispatch("/blogs", fixtures::demo_blogs()).await);
        }
        match blogs::list(self.client).await {
            Ok(list) => Ok(list),
            Err(e) => {
                log::error!("Error loading posts, showing demo data: {}", e);
                Ok(fixtures::demo_blogs())
            }
        }
    }

    pub async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        if self.policy.should_use_mock() {
            mock_dispatch(&format!("/blogs/{}", id), ()).await;
            return Ok(());
        }
        blogs::delete(self.client, id).await
    }

    /// Live profile, falling back to the stored user record when the call fails.
    pub async fn profile(&self) -> Result<User, ApiError> {
        match users::profile(self.client).await {
            Ok(user) => Ok(user),
            Err(e) => match self.client.session().user::<User>() {
                Ok(Some(stored)) => {
                    log::warn!("Using stored profile after failed fetch: {}", e);
                    Ok(stored)
                }
                Ok(None) => Err(e),
                Err(store_err) => {
                    log::warn!("Stored profile unreadable: {}", store_err);
                    Err(e)
                }
            },
        }
    }

    /// Update name and bio, then patch the stored user record to match.
    ///
    /// Once the server has accepted the update the call succeeds; a stored
    /// record that can't be patched is only logged.
    pub async fn update_profile(&self, name: &str, bio: &str) -> Result<(), ApiError> {
        let update = ProfileUpdate {
            name: name.to_string(),
            bio: bio.to_string(),
        };
        users::update_profile(self.client, &update).await?;

        if let Err(e) = self.patch_stored_user(&update) {
            log::warn!("Profile updated but stored user record was not: {}", e);
        }
        Ok(())
    }

    /// Overwrite `name` and `bio` in the stored record, keeping every other field.
    fn patch_stored_user(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let session = self.client.session();
        let Some(raw) = session.user_record()? else {
            return Ok(());
        };
        let mut record: Value = serde_json::from_str(&raw).map_err(SessionError::from)?;
        let Some(fields) = record.as_object_mut() else {
            log::warn!("Stored user record is not an object, leaving it unchanged");
            return Ok(());
        };
        fields.insert("name".to_string(), Value::String(update.name.clone()));
        fields.insert("bio".to_string(), Value::String(update.bio.clone()));
        session.store_user(&record)?;
        Ok(())
    }
}

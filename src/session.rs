//! Session context: the bearer token and stored user profile.
//!
//! The session is an explicit object handed to the API client instead of a
//! global lookup. Its values live in a [`SessionStore`]; the default store is
//! the OS keychain via the `keyring` crate, so credentials never touch disk
//! in plain text.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use keyring::Entry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroize;

/// Keychain service name for stored session values.
pub const SERVICE_NAME: &str = "com.blogclient.session";

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Store key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store operation failed: {0}")]
    Store(String),

    #[error("Stored user record is invalid: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<keyring::Error> for SessionError {
    fn from(err: keyring::Error) -> Self {
        SessionError::Store(err.to_string())
    }
}

/// Persistent string key-value store backing a [`Session`].
pub trait SessionStore: Send + Sync {
    /// Returns `None` when the key has never been set or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Idempotent: removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// OS keychain store, one entry per key under a fixed service name.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl SessionStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SessionError::from(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // already gone
            Err(e) => Err(SessionError::from(e)),
        }
    }
}

/// In-process store. Values are zeroed when removed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> SessionError {
        SessionError::Store("memory store lock poisoned".to_string())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self.values.read().map_err(|_| Self::poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| Self::poisoned())?;
        if let Some(mut old) = values.insert(key.to_string(), value.to_string()) {
            old.zeroize();
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| Self::poisoned())?;
        if let Some(mut old) = values.remove(key) {
            old.zeroize();
        }
        Ok(())
    }
}

/// Session context shared by the API client and the auth flow.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session backed by the OS keychain.
    pub fn keychain() -> Self {
        Self::new(Arc::new(KeychainStore::default()))
    }

    /// Session backed by an in-process store (tests, one-shot runs).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Current bearer token, read from the store on every call.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        self.store.get(TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.token()?.is_some())
    }

    /// Raw stored user record, if any.
    pub fn user_record(&self) -> Result<Option<String>, SessionError> {
        self.store.get(USER_KEY)
    }

    /// Stored user record decoded into `T`.
    pub fn user<T: DeserializeOwned>(&self) -> Result<Option<T>, SessionError> {
        match self.user_record()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored user record.
    pub fn store_user<T: Serialize>(&self, user: &T) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw)
    }

    /// Start a session: persist the user record, then the token.
    ///
    /// A failed write leaves no token behind.
    pub fn begin<T: Serialize>(&self, token: &str, user: &T) -> Result<(), SessionError> {
        self.store_user(user)?;
        if let Err(e) = self.store.set(TOKEN_KEY, token) {
            if let Err(cleanup) = self.store.remove(USER_KEY) {
                log::warn!("Failed to remove user record after token write error: {}", cleanup);
            }
            return Err(e);
        }
        log::info!("Session started");
        Ok(())
    }

    /// End the session: remove the token and user record. Idempotent.
    pub fn end(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        log::info!("Session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        id: u64,
        name: String,
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("never-set").is_ok());
    }

    #[test]
    fn test_session_begin_and_end() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated().unwrap());

        let profile = Profile {
            id: 1,
            name: "Demo User".into(),
        };
        session.begin("jwt-abc", &profile).unwrap();

        assert!(session.is_authenticated().unwrap());
        assert_eq!(session.token().unwrap().as_deref(), Some("jwt-abc"));
        assert_eq!(session.user::<Profile>().unwrap(), Some(profile));

        session.end().unwrap();
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.user_record().unwrap(), None);

        // Ending twice is harmless.
        session.end().unwrap();
    }

    #[test]
    fn test_clones_share_store() {
        let session = Session::in_memory();
        let other = session.clone();
        session.begin("t", &serde_json::json!({"id": 2})).unwrap();
        assert_eq!(other.token().unwrap().as_deref(), Some("t"));
    }

    /// Memory store that rejects writes to one key.
    struct RejectingStore {
        inner: MemoryStore,
        reject: &'static str,
    }

    impl SessionStore for RejectingStore {
        fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
            if key == self.reject {
                return Err(SessionError::Store(format!("write to {} rejected", key)));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), SessionError> {
            self.inner.remove(key)
        }
    }

    fn rejecting(key: &'static str) -> Session {
        Session::new(Arc::new(RejectingStore {
            inner: MemoryStore::new(),
            reject: key,
        }))
    }

    #[test]
    fn test_failed_user_write_leaves_no_token() {
        let session = rejecting(USER_KEY);
        let profile = Profile {
            id: 3,
            name: "Ann".into(),
        };

        let result = session.begin("jwt-abc", &profile);
        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(session.token().unwrap(), None);
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn test_failed_token_write_removes_user_record() {
        let session = rejecting(TOKEN_KEY);
        let profile = Profile {
            id: 3,
            name: "Ann".into(),
        };

        assert!(session.begin("jwt-abc", &profile).is_err());
        assert_eq!(session.user_record().unwrap(), None);
        assert_eq!(session.token().unwrap(), None);
    }

    #[test]
    fn test_invalid_user_record_is_decode_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "not json").unwrap();
        let session = Session::new(store);

        let result = session.user::<Profile>();
        assert!(matches!(result, Err(SessionError::Decode(_))));
    }
}

//! Persisted login session.
//!
//! The token and cached user live in a key-value store (browser local storage
//! in the app, an in-memory map in tests). A [`Session`] is handed to the API
//! client when it is built; nothing else touches the store directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const USERNAME_KEY: &str = "username";

/// Minimal string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Looked up on every call so the type stays `Send`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let storage = Self::storage().ok_or_else(|| AppError::Storage("localStorage is unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| AppError::Storage(format!("Failed to write '{}': {:?}", key, e)))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AppError::Storage(format!("Store lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Arc::new(LocalStorage))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persist the token, the user JSON and the username.
    ///
    /// If any write fails, whatever was written is rolled back so a token is
    /// never left behind without its user.
    pub fn set_session(&self, token: &str, user: &User) -> Result<(), AppError> {
        let user_json = serde_json::to_string(user)
            .map_err(|e| AppError::Storage(format!("Failed to serialize user: {}", e)))?;

        let result = self
            .store
            .set(TOKEN_KEY, token)
            .and_then(|_| self.store.set(USER_KEY, &user_json))
            .and_then(|_| self.store.set(USERNAME_KEY, &user.username));

        if let Err(e) = result {
            warn!("Failed to persist session: {}", e);
            self.clear_session();
            return Err(e);
        }

        info!("Session stored for {}", user.username);
        Ok(())
    }

    pub fn clear_session(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        self.store.remove(USERNAME_KEY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Cached user, or `None` if absent or not valid JSON.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring malformed cached user: {}", e);
                None
            }
        }
    }

    pub fn username(&self) -> Option<String> {
        self.store
            .get(USERNAME_KEY)
            .filter(|u| !u.is_empty())
            .or_else(|| self.current_user().map(|u| u.username))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

//! Credential provider for first-party backend requests.
//!
//! The backend client never reads token storage directly; it asks an injected
//! [`TokenProvider`], which keeps tests free to substitute their own source.

use std::sync::RwLock;

/// Source of the bearer token attached to first-party backend requests.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when no session is active.
    fn token(&self) -> Option<String>;
}

/// In-memory token store, the default [`TokenProvider`].
///
/// A login flow calls [`set`](TokenStore::set) after authenticating and
/// [`clear`](TokenStore::clear) on logout; requests issued in between carry
/// the stored token.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    /// Create an empty token store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token, replacing any previous one.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    /// Drop the stored token.
    pub fn clear(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}

impl TokenProvider for TokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }
}

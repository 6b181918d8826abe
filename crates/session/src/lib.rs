//! Session storage for the Teatro Manager client
//!
//! This crate keeps the bearer token the backend hands out on login. The token
//! lives in a [`TokenStore`] (an in-memory map or a JSON file on disk) and is
//! always read back through [`Session::get_clean_token`], which tolerates the
//! different shapes older clients used to write.

mod store;
mod token;

use std::sync::Arc;

use thiserror::Error;

pub use store::{FileStore, MemoryStore, TokenStore};
pub use token::{clean_token, decode_token, strip_quotes, TokenDecodeError};

/// Storage key the token is written under
pub const DEFAULT_TOKEN_KEY: &str = "userToken";

/// Errors raised by a token store
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Explicit session context shared by every authenticated call
///
/// Cloning a `Session` is cheap; all clones see the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl Session {
    /// Create a session over the given store using the default key
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_key(store, DEFAULT_TOKEN_KEY)
    }

    /// Create a session that reads and writes `key`
    pub fn with_key(store: Arc<dyn TokenStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// A session backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The storage key in use
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw stored value, if any
    pub fn raw_token(&self) -> Option<String> {
        match self.store.get(&self.key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[SESSION] failed to read {}: {}", self.key, e);
                None
            }
        }
    }

    /// Read the token, unwrapping JSON and stray quotes. Returns `""` when
    /// nothing usable is stored.
    pub fn get_clean_token(&self) -> String {
        match self.raw_token() {
            Some(raw) if !raw.is_empty() => clean_token(&raw),
            _ => String::new(),
        }
    }

    /// Whether a token that looks usable is stored
    pub fn has_valid_token(&self) -> bool {
        let token = self.get_clean_token();
        !token.is_empty() && token != "undefined" && token != "null"
    }

    /// Store a token, cleaning it first
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(&self.key, &clean_token(token))
    }

    /// Store a token that was already cleaned, as is
    pub fn set_clean_token(&self, token: &str) -> Result<()> {
        self.store.set(&self.key, token)
    }

    /// Forget the token
    pub fn clear_token(&self) -> Result<()> {
        self.store.remove(&self.key)
    }

    /// Wipe every key in the underlying store
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("has_token", &self.has_valid_token())
            .finish()
    }
}

//! Configuration options for the Teatro Manager client

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5002/api/v1";

/// Configuration options for the Teatro Manager client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL every request path is appended to
    pub api_url: String,

    /// Storage key holding the session token
    pub token_key: String,

    /// File backing the token store. `None` keeps the token in memory.
    pub storage_path: Option<PathBuf>,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Pause between an expired-session message and the redirect to login
    pub redirect_delay: Duration,

    /// Pause between a successful login and the redirect to the catalog
    pub login_redirect_delay: Duration,

    /// Pause before the list is reloaded after a save
    pub refresh_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_key: teatro_session::DEFAULT_TOKEN_KEY.to_string(),
            storage_path: None,
            request_timeout: Some(Duration::from_secs(30)),
            redirect_delay: Duration::from_millis(1500),
            login_redirect_delay: Duration::from_millis(1000),
            refresh_delay: Duration::from_millis(300),
        }
    }
}

impl ClientOptions {
    /// Read overrides from `TEATRO_API_URL`, `TEATRO_TOKEN_KEY`,
    /// `TEATRO_STORAGE_PATH` and `TEATRO_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, Error> {
        let mut options = Self::default();

        if let Ok(url) = std::env::var("TEATRO_API_URL") {
            options = options.with_api_url(&url);
        }
        if let Ok(key) = std::env::var("TEATRO_TOKEN_KEY") {
            if key.trim().is_empty() {
                return Err(Error::config("TEATRO_TOKEN_KEY cannot be empty"));
            }
            options = options.with_token_key(key.trim());
        }
        if let Ok(path) = std::env::var("TEATRO_STORAGE_PATH") {
            options = options.with_storage_path(Some(PathBuf::from(path)));
        }
        if let Ok(secs) = std::env::var("TEATRO_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("invalid TEATRO_TIMEOUT_SECS: {}", secs)))?;
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            options = options.with_request_timeout(timeout);
        }

        Ok(options)
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, value: &str) -> Self {
        self.api_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the token storage key
    pub fn with_token_key(mut self, value: &str) -> Self {
        self.token_key = value.to_string();
        self
    }

    /// Set the token storage file
    pub fn with_storage_path(mut self, value: Option<PathBuf>) -> Self {
        self.storage_path = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the expired-session redirect delay
    pub fn with_redirect_delay(mut self, value: Duration) -> Self {
        self.redirect_delay = value;
        self
    }

    /// Set the post-login redirect delay
    pub fn with_login_redirect_delay(mut self, value: Duration) -> Self {
        self.login_redirect_delay = value;
        self
    }

    /// Set the post-save refresh delay
    pub fn with_refresh_delay(mut self, value: Duration) -> Self {
        self.refresh_delay = value;
        self
    }

    /// Drop every UI delay, for tests and scripted use
    pub fn without_delays(self) -> Self {
        self.with_redirect_delay(Duration::ZERO)
            .with_login_redirect_delay(Duration::ZERO)
            .with_refresh_delay(Duration::ZERO)
    }
}

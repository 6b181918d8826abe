//! Teatro Manager Rust client library
//!
//! A client for the Teatro Manager backend: sign in, then create, list, edit
//! and delete theater productions ("obras"). Every authenticated call goes
//! through [`fetch::ApiClient::api_fetch`], which attaches the session's bearer
//! token. The [`ui`] module drives the sign-in and catalog screens without
//! rendering anything.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod obras;
pub mod ui;

use std::sync::Arc;

use reqwest::Client;
use teatro_session::{FileStore, MemoryStore, Session, TokenStore};

use crate::auth::AuthClient;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::ApiClient;
use crate::obras::ObrasClient;
use crate::ui::{AuthScreen, ObrasScreen};

pub use teatro_session as session;

/// The main entry point for the Teatro Manager client
#[derive(Clone)]
pub struct TeatroManager {
    api: ApiClient,
    options: ClientOptions,
}

impl TeatroManager {
    /// Create a client for the backend at `api_url`, keeping the token in memory
    ///
    /// # Example
    ///
    /// ```
    /// use teatro_manager::TeatroManager;
    ///
    /// let teatro = TeatroManager::new("http://localhost:5002/api/v1").unwrap();
    /// assert!(!teatro.session().has_valid_token());
    /// ```
    pub fn new(api_url: &str) -> Result<Self> {
        Self::new_with_options(ClientOptions::default().with_api_url(api_url))
    }

    /// Create a client with custom options
    ///
    /// The token is persisted to `options.storage_path` when set.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use teatro_manager::{TeatroManager, config::ClientOptions};
    ///
    /// let options = ClientOptions::default()
    ///     .with_api_url("http://localhost:5002/api/v1")
    ///     .with_request_timeout(Some(Duration::from_secs(10)));
    /// let teatro = TeatroManager::new_with_options(options).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self> {
        let store: Arc<dyn TokenStore> = match &options.storage_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        let session = Session::with_key(store, &options.token_key);
        Self::with_session(options, session)
    }

    /// Create a client over an existing session
    pub fn with_session(options: ClientOptions, session: Session) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let api = ApiClient::new(&options.api_url, http_client, session);

        Ok(Self { api, options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The session holding the bearer token
    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// The authenticated request wrapper
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Client for login and registration
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    /// Client for the production catalog
    pub fn obras(&self) -> ObrasClient {
        ObrasClient::new(self.api.clone())
    }

    /// Controller for the login / registration screen
    pub fn auth_screen(&self) -> AuthScreen {
        AuthScreen::new(self.auth(), self.session().clone(), self.options.clone())
    }

    /// Controller for the catalog screen
    pub fn obras_screen(&self) -> ObrasScreen {
        ObrasScreen::new(self.obras(), self.session().clone(), self.options.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::obras::{Obra, ObraDraft};
    pub use crate::ui::{Feedback, Route};
    pub use crate::TeatroManager;
}

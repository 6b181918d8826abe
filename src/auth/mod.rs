//! Login and registration against the Teatro Manager backend

mod types;

use log::{error, info};
use teatro_session::clean_token;

use crate::error::{Error, Result};
use crate::fetch::ApiClient;

pub use types::*;

/// Client for the `/usuarios` endpoints
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in and store the returned token
    pub async fn login(&self, credentials: &Credentials) -> Result<String> {
        self.authenticate(AuthMode::Login, credentials).await
    }

    /// Create an account and store the returned token
    pub async fn register(&self, credentials: &Credentials) -> Result<String> {
        self.authenticate(AuthMode::Register, credentials).await
    }

    /// Post `credentials` to the endpoint of `mode`.
    ///
    /// The request carries no bearer token. On success storage is wiped and
    /// the cleaned token written, then returned.
    pub async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> Result<String> {
        let path = mode.path();
        let url = self.api.url(path)?;

        info!("[AUTH] sending {} for {}", path, credentials.username);

        let response = match self.api.http_client().post(url).json(credentials).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("[AUTH NETWORK ERROR] {}: {}", path, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("[AUTH ERROR] Status {}: {}", status.as_u16(), body);
            return Err(Error::api(status.as_u16(), body));
        }

        let token = clean_token(&body);
        if token.is_empty() {
            return Err(Error::general("backend answered without a token"));
        }

        let session = self.api.session();
        session.clear_all()?;
        session.set_clean_token(&token)?;
        info!("[AUTH] token stored");

        Ok(token)
    }

    /// Forget the stored token
    pub fn logout(&self) -> Result<()> {
        self.api.session().clear_token()?;
        Ok(())
    }

    /// Whether a usable token is stored
    pub fn is_authenticated(&self) -> bool {
        self.api.session().has_valid_token()
    }
}

//! Authenticated HTTP access to the Teatro Manager API
//!
//! Every call against the backend goes through [`ApiClient::api_fetch`]: it
//! resolves the path against the configured base URL, makes sure the request
//! is declared as JSON and carries the session's bearer token when one is
//! stored. The response comes back untouched (status included) so the caller
//! decides what a 401 or a 404 means for it.

use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use teatro_session::Session;
use url::Url;

use crate::error::{Error, Result};

/// Method, headers and body supplied by the caller of [`ApiClient::api_fetch`]
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Use `body` verbatim
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Add the JSON content type (unless the caller chose one) and the bearer
/// token (only when `token` is non-empty).
pub fn compose_headers(mut headers: HeaderMap, token: &str) -> HeaderMap {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if !token.is_empty() {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => error!("[API] stored token is not a valid header value, sending without it"),
        }
    }

    headers
}

/// Buffered response from the API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body rendered for logs: pretty JSON when declared as JSON, else text
    fn diagnostic_body(&self) -> Option<String> {
        if self.is_json() {
            let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
            serde_json::to_string_pretty(&value).ok()
        } else {
            String::from_utf8(self.body.clone()).ok()
        }
    }
}

/// HTTP client bound to the API base URL and the user session
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, http_client: Client, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Send an authenticated request and return the response whatever its status.
    ///
    /// Only a request that never completes is an error.
    pub async fn api_fetch(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let url = self.url(path)?;
        let token = self.session.get_clean_token();
        let headers = compose_headers(options.headers, &token);

        debug!("[API] {} {}", options.method, path);

        let mut request = self
            .http_client
            .request(options.method, url)
            .headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("[NETWORK ERROR] {}: {}", path, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let (body, body_read) = match response.bytes().await {
            Ok(body) => (body.to_vec(), true),
            // a failed request still reaches the caller with its status
            Err(e) if !status.is_success() => {
                debug!("[API] {}: body read failed: {}", path, e);
                (Vec::new(), false)
            }
            Err(e) => {
                error!("[NETWORK ERROR] {}: {}", path, e);
                return Err(e.into());
            }
        };
        let response = ApiResponse::new(status, headers, body);

        if !response.ok() {
            match response.diagnostic_body().filter(|_| body_read) {
                Some(body) => error!("[API ERROR {}] {}: {}", status.as_u16(), path, body),
                None => error!(
                    "[API ERROR {}] {}: response body could not be decoded",
                    status.as_u16(),
                    path
                ),
            }
        }

        Ok(response)
    }

    /// Start a request to `path`
    pub fn fetch(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }
}

/// Helper for building and sending a request through [`ApiClient::api_fetch`]
pub struct FetchBuilder<'a> {
    client: &'a ApiClient,
    path: String,
    options: RequestOptions,
}

impl<'a> FetchBuilder<'a> {
    pub fn new(client: &'a ApiClient, path: &str, method: Method) -> Self {
        Self {
            client,
            path: path.to_string(),
            options: RequestOptions::new(method),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.options.method = method;
        self
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.options = self.options.header(name, value);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.options = self.options.json(body)?;
        Ok(self)
    }

    /// Send the request and return the raw response
    pub async fn send(self) -> Result<ApiResponse> {
        self.client.api_fetch(&self.path, self.options).await
    }

    /// Send the request and parse a successful response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        if !response.ok() {
            return Err(Error::api(response.status().as_u16(), response.text()));
        }
        response.json()
    }
}

//! Low-level HTTP client infrastructure for Matrix API requests
//!
//! This module provides the single HTTP entry point used by every endpoint module:
//! - Generic request/response handling against `{homeserver}{api_prefix}`
//! - Matrix error parsing for non-2xx responses
//! - Bearer token management

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

use crate::ClientConfig;

/// Fallback error code for error bodies that are not Matrix errors
pub const UNKNOWN_ERRCODE: &str = "M_UNKNOWN";

/// HTTP client errors with Matrix error handling
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Matrix error {errcode}: {} (HTTP {status})", .error.as_deref().unwrap_or("Unknown error"))]
    Matrix {
        status: u16,
        errcode: String,
        error: Option<String>,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HttpClientError {
    /// Whether the server answered with a well-formed failure rather than the
    /// request failing in transport or decoding.
    pub fn is_api_error(&self) -> bool {
        matches!(self, HttpClientError::Matrix { .. })
    }
}

/// Low-level HTTP client for Matrix API requests
#[derive(Clone)]
pub struct MatrixHttpClient {
    client: Client,
    homeserver_url: Url,
    api_prefix: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for MatrixHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixHttpClient")
            .field("homeserver_url", &self.homeserver_url.as_str())
            .field("api_prefix", &self.api_prefix)
            .finish_non_exhaustive()
    }
}

impl MatrixHttpClient {
    /// Create a new Matrix HTTP client
    ///
    /// # Arguments
    /// * `config` - Homeserver location, API prefix, timeout and user agent
    ///
    /// # Returns
    /// * `Result<Self, HttpClientError>` - New client or error
    pub fn new(config: &ClientConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let mut homeserver_url = config.homeserver_url.clone();
        if !homeserver_url.path().ends_with('/') {
            let path = format!("{}/", homeserver_url.path());
            homeserver_url.set_path(&path);
        }

        Ok(Self {
            client,
            homeserver_url,
            api_prefix: config.api_prefix.trim_end_matches('/').to_string(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the homeserver URL
    pub fn homeserver_url(&self) -> &Url {
        &self.homeserver_url
    }

    /// Resolve an API path (e.g. "/joined_rooms") against the homeserver and prefix.
    ///
    /// A path on the homeserver URL is kept, so `https://host/matrix` serves the
    /// API under `/matrix/_matrix/...`.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, HttpClientError> {
        let relative = format!("{}{}", self.api_prefix, path);
        Ok(self.homeserver_url.join(relative.trim_start_matches('/'))?)
    }

    /// Generic request method for any request/response types
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, PUT, DELETE, etc.)
    /// * `path` - API path below the prefix (e.g., "/createRoom")
    /// * `query` - Query string pairs, appended in order
    /// * `body` - Optional request body
    ///
    /// # Returns
    /// * `Result<R, HttpClientError>` - Deserialized response or error
    pub async fn request<T, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> Result<R, HttpClientError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let mut url = self.endpoint_url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("{} {}", method, url.path());

        let mut req = self.client.request(method, url);

        if let Some(token) = self.access_token.read().await.as_ref() {
            req = req.bearer_auth(token);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        trace!("HTTP {} body: {}", status, text);

        if status.is_success() {
            Ok(serde_json::from_str::<R>(&text)?)
        } else {
            Err(parse_matrix_error(status.as_u16(), &text))
        }
    }

    /// Set access token for authenticated requests
    pub async fn set_access_token(&self, token: String) {
        let mut guard = self.access_token.write().await;
        *guard = Some(token);
    }

    /// Convenience method for GET requests
    pub async fn get<R>(&self, path: &str) -> Result<R, HttpClientError>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.request::<(), R>(Method::GET, path, &[], None).await
    }

    /// GET with query parameters
    pub async fn get_with_query<R>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, HttpClientError>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.request::<(), R>(Method::GET, path, query, None).await
    }

    /// Convenience method for POST requests
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, HttpClientError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }
}

/// Parse a non-2xx body into a Matrix error.
///
/// JSON without an `errcode` becomes `M_UNKNOWN`; a body that is not JSON at
/// all is a decoding failure.
fn parse_matrix_error(status: u16, body: &str) -> HttpClientError {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(e) => return HttpClientError::Serialization(e),
    };
    let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    HttpClientError::Matrix {
        status,
        errcode: field("errcode").unwrap_or_else(|| UNKNOWN_ERRCODE.to_string()),
        error: field("error"),
    }
}

//! Thin HTTP wrapper around the backend.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ErrorBody, Result};

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Where the client reads the bearer token from, and what it clears on 401.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if any.
    fn token(&self) -> Option<String>;

    /// Drops the stored token and user.
    fn clear(&self);
}

/// HTTP client bound to one backend base URL.
///
/// Cloning is cheap; clones share the connection pool and the session store.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    session: Option<Arc<dyn SessionStore>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_session", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns a config error if the URL cannot be parsed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| ApiError::config(format!("Invalid API base URL {base_url}: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            session: None,
        })
    }

    /// Attaches the session store used for bearer tokens and 401 handling.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::GET, path).query(query))
            .await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body))
            .await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PATCH, path).json(body))
            .await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport, status or decode failures.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, self.endpoint(path))
            .header(ACCEPT, "application/json");

        if let Some(token) = self.session.as_ref().and_then(|s| s.token()) {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {e}");
            ApiError::from_transport(&e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        debug!("{} {url} ({} bytes)", status.as_u16(), bytes.len());

        if status.is_success() {
            // Empty 2xx bodies decode as JSON null so `()` and `Option<_>` payloads work.
            let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            return serde_json::from_slice(payload).map_err(ApiError::decode);
        }

        let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected credentials for {url}, clearing session");
            if let Some(session) = &self.session {
                session.clear();
            }
        }

        Err(ApiError::from_status(status.as_u16(), body))
    }
}

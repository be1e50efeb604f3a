//! HTTP client for the GoBarber REST API.
//!
//! `ApiClient` is shared by every part of the application. It carries a
//! mutable map of default headers that is applied to each outbound request;
//! the `Authorization` entry in that map is owned by
//! [`RequestAuthorizer`](crate::auth::RequestAuthorizer).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when nothing is configured (the API's development port)
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the GoBarber server.
/// Clone is cheap - clones share the connection pool and the default headers.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: Arc<Mutex<HeaderMap>>,
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers: Arc::new(Mutex::new(HeaderMap::new())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current value of a default header, if set.
    pub fn default_header(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.headers().get(name).cloned()
    }

    /// Replace a default header. Applies to every request sent afterwards.
    pub(crate) fn set_default_header(&self, name: HeaderName, value: HeaderValue) {
        self.headers().insert(name, value);
    }

    pub(crate) fn remove_default_header(&self, name: &HeaderName) {
        self.headers().remove(name);
    }

    fn headers(&self) -> MutexGuard<'_, HeaderMap> {
        self.default_headers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let headers = self.headers().clone();
        self.client.request(method, self.url(path)).headers(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> Result<Option<Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    /// Send a request built by `build`, retrying with exponential backoff
    /// while the server answers 429.
    async fn send_with_retry<F>(&self, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = build().send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(path = path, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    // ===== Verbs =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.send_with_retry(path, || self.request(Method::GET, path)).await?;
        Self::parse_json(response, path).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .send_with_retry(path, || self.request(Method::POST, path).json(body))
            .await?;
        Self::parse_json(response, path).await
    }

    /// POST where the response body carries nothing the caller needs.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        debug!(path, "POST");
        self.send_with_retry(path, || self.request(Method::POST, path).json(body))
            .await?;
        Ok(())
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let response = self
            .send_with_retry(path, || self.request(Method::PUT, path).json(body))
            .await?;
        Self::parse_json(response, path).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!(path, "PATCH");
        let response = self
            .send_with_retry(path, || self.request(Method::PATCH, path).json(body))
            .await?;
        Self::parse_json(response, path).await
    }

    /// Multipart forms are consumed on send, so this is a single attempt.
    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        debug!(path, "PATCH multipart");
        let response = self.request(Method::PATCH, path).multipart(form).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }

    /// One POST, no retry. Used for exchanges that must not be repeated
    /// behind the caller's back, such as signing in.
    pub async fn post_once<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        debug!(path, "POST (single attempt)");
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_url_joins_base_and_path() {
        let api = ApiClient::new("http://localhost:3333/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:3333");
        assert_eq!(api.url("sessions"), "http://localhost:3333/sessions");
        assert_eq!(api.url("/password/forgot"), "http://localhost:3333/password/forgot");
    }

    #[test]
    fn test_default_headers_are_shared_between_clones() {
        let api = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        let clone = api.clone();

        api.set_default_header(AUTHORIZATION, HeaderValue::from_static("Bearer one"));
        assert_eq!(
            clone.default_header(&AUTHORIZATION),
            Some(HeaderValue::from_static("Bearer one"))
        );

        clone.remove_default_header(&AUTHORIZATION);
        assert_eq!(api.default_header(&AUTHORIZATION), None);
    }
}

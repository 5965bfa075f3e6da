//! HTTP client for the storefront REST API.
//!
//! Wraps `reqwest` with bearer-token authentication, typed response
//! deserialization, and uniform error mapping: any non-2xx status becomes
//! [`ApiError::Status`] carrying the server's `"message"` verbatim when the
//! body has one.

use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::AppConfig;
use uuid::Uuid;

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::types::ErrorBody;

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Client for the storefront REST API.
///
/// Use [`StorefrontClient::new`] with the loaded [`AppConfig`], or
/// [`StorefrontClient::with_base_url`] to point at a mock server in tests.
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl StorefrontClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if the configured base
    /// URL is unusable.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            config.http_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client with an explicit base URL and retry policy.
    ///
    /// `max_retries` applies to GET requests only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an absolute http(s) URL".to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds an endpoint URL by appending percent-encoded path segments to
    /// the base URL's path.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a GET request with retry on transient failures and decodes the
    /// JSON body.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::read_json`]; transport failures become
    /// [`ApiError::Timeout`] or [`ApiError::Http`].
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            tracing::debug!(url = %url, "GET");
            let mut request = self.client.get(url.clone());
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await.map_err(map_transport)?;
            Self::read_json(response, &format!("GET {}", url.path())).await
        })
        .await
    }

    /// Sends a JSON body exactly once and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::read_json`]; transport failures become
    /// [`ApiError::Timeout`] or [`ApiError::Http`].
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        url: &Url,
        token: Option<&str>,
        body: &B,
        idempotency_key: Option<Uuid>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let context = format!("{method} {}", url.path());
        tracing::debug!(url = %url, %method, "sending");
        let mut request = self.client.request(method, url.clone()).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key.to_string());
        }
        let response = request.send().await.map_err(map_transport)?;
        Self::read_json(response, &context).await
    }

    /// Sends a bodyless DELETE once. Whatever the server answers with on
    /// success is discarded.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::read_json`]; transport failures become
    /// [`ApiError::Timeout`] or [`ApiError::Http`].
    pub(crate) async fn delete(&self, url: &Url, token: &str) -> Result<(), ApiError> {
        tracing::debug!(url = %url, "DELETE");
        let response = self
            .client
            .delete(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport)?;
        let _: serde_json::Value =
            Self::read_json(response, &format!("DELETE {}", url.path())).await?;
        Ok(())
    }

    /// Checks the HTTP status and parses the body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] for a non-2xx status.
    /// - [`ApiError::Deserialize`] if a 2xx body does not match `T`.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await.map_err(map_transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            tracing::debug!(status = status.as_u16(), context, ?message, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Treat an empty success body as JSON null so `()`-like targets decode.
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

fn map_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Http(err)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

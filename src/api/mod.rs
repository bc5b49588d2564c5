//! HTTP client for the assistant backend
//!
//! One `ApiClient` is shared by every panel. Endpoint groups live in the
//! submodules; this module owns the underlying `reqwest` client and the
//! response decoding shared by all of them.

pub mod files;
pub mod learning;
pub mod market;
pub mod query;
pub mod types;
pub mod upload;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct ApiClient {
    client: Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base: config.backend_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL the client talks to, without a trailing slash
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Probe the backend root; used at startup to report connectivity
    pub async fn ping(&self) -> Result<String> {
        let response = self.client.get(format!("{}/", self.base)).send().await?;
        let welcome: types::WelcomeResponse = Self::decode(response).await?;
        Ok(welcome
            .message
            .unwrap_or_else(|| "backend reachable".to_string()))
    }

    /// Decode a JSON response, normalising the backend's error envelopes.
    ///
    /// Failures arrive in three shapes: a non-2xx with `{"detail": ...}`, a
    /// non-2xx with `{"error": ...}`, or a 200 whose body is the two-element
    /// array `[{"error": ...}, code]`. All three become `AppError` here so
    /// callers only see typed payloads.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        let mut value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        if let Value::Array(items) = value {
            value = items.into_iter().next().unwrap_or(Value::Null);
        }

        if !status.is_success() {
            let message = value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("backend returned {}", status));
            return Err(if status == StatusCode::NOT_FOUND {
                AppError::NotFound(message)
            } else {
                AppError::Backend(message)
            });
        }

        if value.is_null() {
            return Err(AppError::Backend(format!(
                "unexpected non-JSON response ({})",
                status
            )));
        }

        serde_json::from_value(value).map_err(AppError::from)
    }

    /// Read a binary response body, mapping backend failures like `decode`
    async fn binary(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let message = value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("backend returned {}", status));
            return Err(if status == StatusCode::NOT_FOUND {
                AppError::NotFound(message)
            } else {
                AppError::Backend(message)
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn base_url_has_no_trailing_slash() {
        let config = AppConfig::default();
        let client = ApiClient::new(&config);
        assert!(!client.base().ends_with('/'));
        assert!(client.base().starts_with("http"));
    }
}

//! HTTP client for the console backend
//!
//! Every request carries the configured default headers, and absolute paths
//! are resolved against the configured base URL.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::domain::auth::AuthConfig;
use crate::domain::console::ConsoleConfig;

/// Where the identity provider settings are served from
pub const AUTH_CONFIG_PATH: &str = "/console-resource/auth_config.json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ConsoleConfig,
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.default_headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name '{}'", name))?;
            let header_value = HeaderValue::from_str(&value)
                .with_context(|| format!("Invalid value for header '{}'", name))?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        self.config.base(path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("GET {} returned {}: {}", url, status, text));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    pub async fn fetch_auth_config(&self) -> Result<AuthConfig> {
        self.get_json(AUTH_CONFIG_PATH).await
    }
}

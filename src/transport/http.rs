//! HTTP transport backed by reqwest.
//!
//! Resolves endpoints against a base URL and maps failures to `TransportError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client,
};
use serde_json::Value;
use tracing::debug;

use super::{Method, Params, Response, Transport};
use crate::config::Config;
use crate::error::{ConfigurationError, TransportError};

const USER_AGENT_VALUE: &str = concat!("fetch-cache/", env!("CARGO_PKG_VERSION"));

/// reqwest-based transport for a single upstream service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout and an
    /// optional bearer token.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        api_key: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e| {
                ConfigurationError::Invalid {
                    field: "api_key",
                    reason: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::Invalid {
                field: "http_client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a transport from the upstream settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        Self::new(
            &config.upstream_url,
            config.request_timeout(),
            config.api_key.as_deref(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &Params,
    ) -> Result<Response, TransportError> {
        let url = self.url_for(endpoint);
        debug!(%method, %url, "Sending upstream request");

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = if method.uses_query() {
            builder.query(params)
        } else {
            builder.json(params)
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
        };

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

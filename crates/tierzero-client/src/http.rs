use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::transport::{Method, Transport, TransportError};

/// Path prefix of the versioned API below the configured base URL.
pub const API_PREFIX: &str = "/api/v1";

/// [`Transport`] over HTTPS using reqwest, authenticated with the
/// organization API key.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Build a transport from validated configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_client(http, &config.base_url, config.api_key.clone()))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.api_url(path);
        let mut req = self
            .http
            .request(method.into(), &url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");
        if let Some(body) = &body {
            req = req.json(body);
        }

        tracing::trace!(%method, %url, "Sending request");
        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::connection(format!("{method} {path}: {e}")))?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Vec<u8>, TransportError> {
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| TransportError::connection(format!("Failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(TransportError::status(status.as_u16(), error_message(&body)));
    }

    Ok(body.to_vec())
}

/// Prefer the remote's `error` / `message` JSON field over the raw body.
fn error_message(body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body)
        && let Some(msg) = ["error", "message", "detail"]
            .iter()
            .find_map(|key| json.get(key).and_then(|v| v.as_str()))
    {
        return msg.to_string();
    }
    String::from_utf8_lossy(body).trim().to_string()
}

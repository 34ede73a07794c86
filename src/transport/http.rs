use crate::drivers::DriverRequest;
use crate::{Error, ErrorContext, Result};
use reqwest::Proxy;
use serde_json::Value;
use std::env;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{body_excerpt, TransportError};

/// Wall-clock bound for a single HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// Transport knobs. Builder values win over environment values.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub proxy_url: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy_url: None,
        }
    }
}

impl TransportConfig {
    /// Read `SLANGSHIELD_HTTP_TIMEOUT_SECS` and `SLANGSHIELD_PROXY_URL`.
    pub fn from_env() -> Self {
        let timeout = env::var("SLANGSHIELD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let proxy_url = env::var("SLANGSHIELD_PROXY_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self { timeout, proxy_url }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::settings_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("SLANGSHIELD_PROXY_URL")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::settings_with_context(
                format!("failed to build HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body and decode the JSON answer.
    ///
    /// The whole exchange (connect, headers, body) runs under one deadline; when it
    /// elapses the in-flight future is dropped, which aborts the request.
    pub async fn post_json(
        &self,
        request: &DriverRequest,
        request_id: Option<&str>,
    ) -> std::result::Result<Value, TransportError> {
        let start = Instant::now();
        let exchange = self.exchange(request, request_id);
        let result = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(r) => r,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        };
        debug!(
            url = request.url.as_str(),
            duration_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "slangshield http exchange finished"
        );
        result
    }

    async fn exchange(
        &self,
        request: &DriverRequest,
        request_id: Option<&str>,
    ) -> std::result::Result<Value, TransportError> {
        let mut req = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(id) = request_id {
            // Correlation id; providers ignore it.
            req = req.header("x-slangshield-request-id", id);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = read_error_body(resp).await;
            return Err(TransportError::Status {
                status,
                body_excerpt: body,
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        serde_json::from_str(&text).map_err(|_| TransportError::MalformedBody {
            status,
            body_excerpt: body_excerpt(&text),
        })
    }
}

/// Best-effort read of an error body; never fails.
async fn read_error_body(resp: reqwest::Response) -> String {
    match resp.text().await {
        Ok(t) => body_excerpt(&t),
        Err(_) => String::new(),
    }
}

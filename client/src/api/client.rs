//! Query backend client
//!
//! `QueryTransport` is the only seam between the chat session and the
//! backend. `HttpTransport` is the production implementation; tests inject
//! their own.

use crate::api::types::QueryResponse;
use crate::config::{Config, PROCESS_QUERY_PATH};
use crate::error::{ConfigError, TransportError};
use async_trait::async_trait;
use std::time::Duration;

/// Name of the form field carrying the natural-language query
pub const QUERY_FORM_FIELD: &str = "user_query";

/// Sends a natural-language query to the backend
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Send one query and return the parsed response body
    ///
    /// # Errors
    /// * Returns a `TransportError` for anything other than a 2xx response
    ///   with a JSON object body.
    async fn process_query(&self, query: &str) -> Result<QueryResponse, TransportError>;
}

/// HTTP implementation of `QueryTransport`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport from configuration
    ///
    /// # Errors
    /// * Returns `ConfigError::HttpClient` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(
            client,
            config.endpoint_url(),
            config.request_timeout(),
        ))
    }

    /// Create a transport that reuses an existing client (connection pooling)
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Create a transport for a backend at `base_url`
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            format!("{}{}", base_url.trim_end_matches('/'), PROCESS_QUERY_PATH),
            timeout,
        )
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn process_query(&self, query: &str) -> Result<QueryResponse, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            query_len = query.len(),
            "Sending query to backend"
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .form(&[(QUERY_FORM_FIELD, query)]);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %body,
                "Query backend returned error status"
            );
            return Err(TransportError::Status {
                status: status_code,
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.send_error(e))?;

        let parsed: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %body, "Failed to parse backend response");
            TransportError::MalformedBody(e.to_string())
        })?;

        tracing::debug!(
            has_error = parsed.error.is_some(),
            rows = parsed.result.as_ref().map(|r| r.len()),
            "Received response from backend"
        );

        Ok(parsed)
    }
}

impl HttpTransport {
    fn send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            tracing::warn!(timeout_secs = secs, "Query backend timed out");
            TransportError::Timeout(secs)
        } else {
            tracing::error!(error = %e, "Failed to reach query backend");
            TransportError::Network(e.to_string())
        }
    }
}

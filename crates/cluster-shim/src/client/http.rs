//! reqwest-backed cluster API client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use super::cluster_api::{ApiRequest, ApiResponse, ClusterApi, JSON_CONTENT_TYPE};
use crate::config::ShimConfig;
use crate::error::ClusterApiError;

/// HTTP client for the cluster API server.
#[derive(Clone)]
pub struct HttpClusterApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClusterApi {
    /// Create a client for the given API server URL.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build cluster API client, using defaults");
                reqwest::Client::default()
            });

        Self::with_client(client, base_url)
    }

    /// Create a client with a preconfigured reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Build a client from shim configuration.
    pub fn from_config(config: &ShimConfig) -> Result<Self, ClusterApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.cluster_api_timeout)
            .danger_accept_invalid_certs(config.cluster_api_insecure)
            .build()?;

        let api = Self::with_client(client, &config.cluster_api_url);
        Ok(match &config.cluster_api_token {
            Some(token) => api.with_token(token),
            None => api,
        })
    }

    /// Authenticate with a bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn url(&self, uri: &str) -> String {
        format!("{}{}", self.base_url, uri)
    }
}

#[async_trait]
impl ClusterApi for HttpClusterApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClusterApiError> {
        let url = self.url(&request.uri);

        tracing::debug!(
            method = %request.verb.method(),
            url = %url,
            body_len = request.body.len(),
            "Sending cluster API request"
        );

        let mut builder = self
            .client
            .request(request.verb.method(), &url)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, request.verb.content_type())
            .body(request.body);

        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        // An unreadable body counts as empty.
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!(url = %url, status, error = %e, "Failed to read cluster API response body");
                Vec::new()
            }
        };

        Ok(ApiResponse { status, body })
    }
}

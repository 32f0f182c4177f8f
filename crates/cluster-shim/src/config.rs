//! Shim configuration.

use anyhow::Result;
use std::time::Duration;

/// Cluster shim configuration.
#[derive(Debug, Clone)]
pub struct ShimConfig {
    /// Unique shim identifier (UUID).
    pub shim_id: String,

    /// Cluster API server URL.
    pub cluster_api_url: String,

    /// Bearer token for the cluster API.
    pub cluster_api_token: Option<String>,

    /// Cluster API request timeout.
    pub cluster_api_timeout: Duration,

    /// Skip TLS certificate verification.
    pub cluster_api_insecure: bool,

    /// NATS server URL.
    pub nats_url: String,

    /// NATS subject carrying control requests.
    pub subject: String,

    /// Maximum messages handled at once.
    pub max_concurrent_messages: usize,
}

impl ShimConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let shim_id = std::env::var("SHIM_ID").unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());

        let cluster_api_url = std::env::var("CLUSTER_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8001".to_string());

        let cluster_api_token = std::env::var("CLUSTER_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let timeout_secs: u64 = match std::env::var("CLUSTER_API_TIMEOUT_SECS") {
            Ok(s) => s
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid CLUSTER_API_TIMEOUT_SECS '{}': {}", s, e))?,
            Err(_) => 30,
        };

        let cluster_api_insecure = std::env::var("CLUSTER_API_INSECURE")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let subject = std::env::var("SHIM_SUBJECT")
            .unwrap_or_else(|_| "clustershim.requests".to_string());

        let max_concurrent: usize = std::env::var("SHIM_MAX_CONCURRENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(4);

        Ok(Self {
            shim_id,
            cluster_api_url,
            cluster_api_token,
            cluster_api_timeout: Duration::from_secs(timeout_secs),
            cluster_api_insecure,
            nats_url,
            subject,
            max_concurrent_messages: max_concurrent,
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            shim_id: uuid::Uuid::new_v4().to_string(),
            cluster_api_url: "http://127.0.0.1:8001".to_string(),
            cluster_api_token: None,
            cluster_api_timeout: Duration::from_secs(30),
            cluster_api_insecure: false,
            nats_url: "nats://localhost:4222".to_string(),
            subject: "clustershim.requests".to_string(),
            max_concurrent_messages: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ShimConfig::default();
        assert!(!config.shim_id.is_empty());
        assert_eq!(config.subject, "clustershim.requests");
        assert_eq!(config.max_concurrent_messages, 4);
        assert_eq!(config.cluster_api_timeout, Duration::from_secs(30));
        assert!(config.cluster_api_token.is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" YES "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}

//! Cluster API capability.

use async_trait::async_trait;
use reqwest::Method;
use std::borrow::Cow;

use crate::error::ClusterApiError;

/// Content type of JSON patch documents.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Content type of plain JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request verb accepted by the cluster API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    /// PATCH with a JSON patch body.
    JsonPatch,
}

impl Verb {
    /// HTTP method sent on the wire.
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
            Verb::JsonPatch => Method::PATCH,
        }
    }

    /// Content type of the request body.
    pub fn content_type(self) -> &'static str {
        match self {
            Verb::JsonPatch => JSON_PATCH_CONTENT_TYPE,
            _ => JSON_CONTENT_TYPE,
        }
    }
}

/// Map a task method to a request verb.
///
/// Matching is exact: `"get"` is not `"GET"`.
pub fn request_verb(method: &str) -> Option<Verb> {
    match method {
        "GET" => Some(Verb::Get),
        "POST" => Some(Verb::Post),
        "PUT" => Some(Verb::Put),
        "DELETE" => Some(Verb::Delete),
        "PATCH" => Some(Verb::JsonPatch),
        _ => None,
    }
}

/// A request against the cluster API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub verb: Verb,

    /// Literal request path, sent without escaping.
    pub uri: String,

    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Create a request template for the given verb.
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            uri: String::new(),
            body: Vec::new(),
        }
    }

    /// Set the request path.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Set the request payload.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Status and raw body returned by the cluster API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        if let Cow::Owned(_) = text {
            tracing::debug!(
                status = self.status,
                body_len = self.body.len(),
                "Cluster API response body is not valid UTF-8, replacing invalid bytes"
            );
        }
        text.into_owned()
    }
}

/// REST-capable client for the managed cluster.
///
/// Implementations are shared across concurrent dispatches and must be
/// reentrant. An error status is an `Ok` response; `Err` means no response
/// was obtained.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Send one request and wait for its response.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClusterApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_verb_mapping() {
        assert_eq!(request_verb("GET"), Some(Verb::Get));
        assert_eq!(request_verb("POST"), Some(Verb::Post));
        assert_eq!(request_verb("PUT"), Some(Verb::Put));
        assert_eq!(request_verb("DELETE"), Some(Verb::Delete));
        assert_eq!(request_verb("PATCH"), Some(Verb::JsonPatch));
    }

    #[test]
    fn test_request_verb_rejects_others() {
        for method in ["HEAD", "OPTIONS", "TRACE", "get", "Patch", ""] {
            assert_eq!(request_verb(method), None, "{method} should be rejected");
        }
    }

    #[test]
    fn test_verb_wire_form() {
        assert_eq!(Verb::JsonPatch.method(), Method::PATCH);
        assert_eq!(Verb::JsonPatch.content_type(), "application/json-patch+json");
        assert_eq!(Verb::Delete.method(), Method::DELETE);
        assert_eq!(Verb::Post.content_type(), "application/json");
    }

    #[test]
    fn test_template_derivation() {
        let template = ApiRequest::new(Verb::Post).uri("/api/v1/namespaces/default/configmaps");
        let first = template.clone().body("a");
        let second = template.clone().body("b");

        assert_eq!(first.uri, second.uri);
        assert_eq!(first.body, b"a");
        assert_eq!(second.body, b"b");
        assert!(template.body.is_empty());
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, "OK").is_success());
        assert!(ApiResponse::new(201, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
        assert_eq!(ApiResponse::new(200, "OK").text(), "OK");
    }

    #[test]
    fn test_response_text_replaces_invalid_utf8() {
        let response = ApiResponse::new(200, vec![b'o', b'k', 0xff]);
        assert_eq!(response.text(), "ok\u{fffd}");
    }
}

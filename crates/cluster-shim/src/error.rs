//! Shim error types.

use std::fmt;
use thiserror::Error;

use crate::message::{ClusterMessage, CommandType, ControlTaskResponse};

/// Payload kind a task extractor was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    ControlTask,
    ControlMultiTask,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::ControlTask => f.write_str("ControlTask"),
            TaskKind::ControlMultiTask => f.write_str("ControlMultiTask"),
        }
    }
}

/// Errors raised while translating a cluster message.
#[derive(Debug, Error)]
pub enum ShimError {
    /// Command kind is not handled by this shim.
    #[error("command {0} is not supported by the cluster API handler")]
    UnsupportedCommand(CommandType),

    /// Message body did not decode into the expected task.
    #[error("{0} not found")]
    TaskNotFound(TaskKind),

    /// Task method is outside GET, POST, PUT, DELETE and PATCH.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
}

/// A single control task that was refused before reaching the cluster API.
///
/// Carries the 404/405 response that is still sent back to the requester.
#[derive(Debug, Error)]
#[error("control task rejected with status {}", .response.status_code)]
pub struct RejectedTask {
    pub response: ControlTaskResponse,
    #[source]
    pub source: ShimError,
}

/// Dispatch failure, with the reply that should still be delivered, if any.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct DispatchError {
    pub reply: Option<ClusterMessage>,
    pub source: ShimError,
}

impl DispatchError {
    /// Failure with nothing to send back.
    pub fn without_reply(source: ShimError) -> Self {
        Self {
            reply: None,
            source,
        }
    }
}

/// Errors from the cluster API capability.
///
/// Only raised when no response was obtained; error statuses are responses.
#[derive(Debug, Error)]
pub enum ClusterApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Base URL and URI did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ClusterApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ClusterApiError::InvalidUrl(e.to_string())
        } else {
            ClusterApiError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShimError::UnsupportedCommand(CommandType::EdgeReport);
        assert_eq!(
            err.to_string(),
            "command EdgeReport is not supported by the cluster API handler"
        );

        let err = ShimError::TaskNotFound(TaskKind::ControlMultiTask);
        assert_eq!(err.to_string(), "ControlMultiTask not found");

        let err = ShimError::MethodNotAllowed("HEAD".to_string());
        assert_eq!(err.to_string(), "method not allowed: HEAD");
    }

    #[test]
    fn test_rejected_task_keeps_source() {
        let rejected = RejectedTask {
            response: ControlTaskResponse::new(405, ""),
            source: ShimError::MethodNotAllowed("TRACE".to_string()),
        };
        assert_eq!(rejected.to_string(), "control task rejected with status 405");
        let source = std::error::Error::source(&rejected).unwrap();
        assert_eq!(source.to_string(), "method not allowed: TRACE");
    }
}

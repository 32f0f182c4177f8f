//! Single control task execution.

use reqwest::StatusCode;
use std::sync::Arc;

use crate::client::{request_verb, ApiRequest, ClusterApi};
use crate::codec::TaskExtractor;
use crate::error::{RejectedTask, ShimError, TaskKind};
use crate::message::{ClusterMessage, ControlTaskResponse};

/// Status reported when the cluster API could not be reached.
const NO_RESPONSE_STATUS: i32 = 0;

/// Executes one control task against the cluster API.
pub struct SingleTaskExecutor {
    api: Arc<dyn ClusterApi>,
    extractor: Arc<dyn TaskExtractor>,
}

impl SingleTaskExecutor {
    pub fn new(api: Arc<dyn ClusterApi>, extractor: Arc<dyn TaskExtractor>) -> Self {
        Self { api, extractor }
    }

    /// Execute the control task carried by `msg`.
    ///
    /// Missing tasks and unsupported methods are rejected with a 404 or 405
    /// response before any request is sent. Once a request has been sent the
    /// result is always `Ok`, carrying whatever status the API returned.
    pub async fn execute(&self, msg: &ClusterMessage) -> Result<ControlTaskResponse, RejectedTask> {
        let Some(task) = self.extractor.control_task(msg) else {
            return Err(reject(
                StatusCode::NOT_FOUND,
                ShimError::TaskNotFound(TaskKind::ControlTask),
            ));
        };

        let Some(verb) = request_verb(&task.method) else {
            return Err(reject(
                StatusCode::METHOD_NOT_ALLOWED,
                ShimError::MethodNotAllowed(task.method),
            ));
        };

        tracing::debug!(
            message_id = %msg.head.message_id,
            method = %task.method,
            uri = %task.uri,
            "Executing control task"
        );

        let request = ApiRequest::new(verb).uri(task.uri).body(task.body);

        match self.api.execute(request).await {
            Ok(response) => Ok(ControlTaskResponse::new(
                i32::from(response.status),
                response.text(),
            )),
            Err(e) => {
                tracing::warn!(
                    message_id = %msg.head.message_id,
                    error = %e,
                    "Cluster API request failed without a response"
                );
                Ok(ControlTaskResponse::new(NO_RESPONSE_STATUS, ""))
            }
        }
    }
}

fn reject(status: StatusCode, source: ShimError) -> RejectedTask {
    RejectedTask {
        response: ControlTaskResponse::new(i32::from(status.as_u16()), ""),
        source,
    }
}

//! Cluster message dispatch.

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::ClusterApi;
use crate::codec::{JsonTaskExtractor, TaskExtractor};
use crate::error::{DispatchError, ShimError};
use crate::executor::{BatchTaskExecutor, SingleTaskExecutor};
use crate::message::{ClusterMessage, CommandType};
use crate::response::{control_task_response, response};

/// Handles one cluster message and produces an optional reply.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, msg: &ClusterMessage) -> Result<Option<ClusterMessage>, DispatchError>;
}

/// Routes control requests to the cluster API executors.
pub struct ClusterApiHandler {
    single: SingleTaskExecutor,
    batch: BatchTaskExecutor,
}

impl ClusterApiHandler {
    /// Create a handler decoding payloads as JSON.
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        Self::with_extractor(api, Arc::new(JsonTaskExtractor))
    }

    /// Create a handler with a custom payload decoder.
    pub fn with_extractor(api: Arc<dyn ClusterApi>, extractor: Arc<dyn TaskExtractor>) -> Self {
        Self {
            single: SingleTaskExecutor::new(api.clone(), extractor.clone()),
            batch: BatchTaskExecutor::new(api, extractor),
        }
    }
}

#[async_trait]
impl Handler for ClusterApiHandler {
    async fn handle(&self, msg: &ClusterMessage) -> Result<Option<ClusterMessage>, DispatchError> {
        match msg.head.command {
            CommandType::ControlReq => match self.single.execute(msg).await {
                Ok(resp) => {
                    let payload = control_task_response(resp.status_code, &resp.body);
                    Ok(Some(response(payload, &msg.head)))
                }
                Err(rejected) => {
                    let payload =
                        control_task_response(rejected.response.status_code, &rejected.response.body);
                    Err(DispatchError {
                        reply: Some(response(payload, &msg.head)),
                        source: rejected.source,
                    })
                }
            },
            CommandType::ControlMultiReq => self
                .batch
                .execute(msg)
                .await
                .map(|()| None)
                .map_err(DispatchError::without_reply),
            other => Err(DispatchError::without_reply(ShimError::UnsupportedCommand(other))),
        }
    }
}

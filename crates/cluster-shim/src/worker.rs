//! Shim lifecycle management.

use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::client::HttpClusterApi;
use crate::codec::decode_message;
use crate::config::ShimConfig;
use crate::handler::{ClusterApiHandler, Handler};
use crate::message::ClusterMessage;
use crate::nats::NatsBridge;

/// Receives cluster messages from NATS and answers them.
pub struct Shim {
    /// Shim configuration.
    config: ShimConfig,

    /// Message bus connection.
    bridge: NatsBridge,

    /// Cluster message handler.
    handler: Arc<dyn Handler>,

    /// Semaphore bounding in-flight messages.
    semaphore: Arc<Semaphore>,
}

impl Shim {
    /// Create a shim backed by the HTTP cluster API client.
    pub async fn new(config: ShimConfig) -> Result<Self> {
        let api = HttpClusterApi::from_config(&config)?;
        let handler = Arc::new(ClusterApiHandler::new(Arc::new(api)));

        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let client_name = format!("cluster-shim-{}-{}", hostname, config.shim_id);

        let bridge = NatsBridge::connect(&config.nats_url, &client_name).await?;

        Ok(Self::with_handler(config, bridge, handler))
    }

    /// Create a shim with a custom handler.
    pub fn with_handler(config: ShimConfig, bridge: NatsBridge, handler: Arc<dyn Handler>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_messages));

        Self {
            config,
            bridge,
            handler,
            semaphore,
        }
    }

    /// Run until the subscription ends.
    pub async fn run(&self) -> Result<()> {
        let mut subscriber = self.bridge.subscribe(&self.config.subject).await?;

        tracing::info!(
            shim_id = %self.config.shim_id,
            subject = %self.config.subject,
            max_concurrent = self.config.max_concurrent_messages,
            "Shim ready"
        );

        while let Some(message) = subscriber.next().await {
            // Wait for available slot
            let permit = self.semaphore.clone().acquire_owned().await?;

            let msg = match decode_message(&message.payload) {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(
                        subject = %message.subject,
                        error = %e,
                        "Dropping undecodable cluster message"
                    );
                    continue;
                }
            };

            let handler = self.handler.clone();
            let bridge = self.bridge.clone();
            let reply_to = message.reply.clone();

            tokio::spawn(async move {
                // Keep permit until done
                let _permit = permit;

                let Some(reply) = handle_message(handler.as_ref(), &msg).await else {
                    return;
                };

                match reply_to {
                    Some(subject) => {
                        if let Err(e) = bridge.reply(subject, &reply).await {
                            tracing::error!(
                                message_id = %reply.head.message_id,
                                error = %e,
                                "Failed to send reply"
                            );
                        }
                    }
                    None => {
                        tracing::debug!(
                            message_id = %reply.head.message_id,
                            "No reply subject, discarding reply"
                        );
                    }
                }
            });
        }

        tracing::warn!(subject = %self.config.subject, "Subscription closed");
        Ok(())
    }
}

/// Handle one message, logging failures, and return the reply to send.
pub async fn handle_message(handler: &dyn Handler, msg: &ClusterMessage) -> Option<ClusterMessage> {
    tracing::debug!(
        message_id = %msg.head.message_id,
        command = %msg.head.command,
        "Received cluster message"
    );

    match handler.handle(msg).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(
                message_id = %msg.head.message_id,
                command = %msg.head.command,
                error = %e,
                "Cluster message handling failed"
            );
            e.reply
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClusterApi;
    use crate::client::ApiResponse;
    use crate::message::{CommandType, ControlTaskResponse};
    use crate::response::parse_control_task_response;

    #[tokio::test]
    async fn test_handle_message_returns_reply() {
        let api = Arc::new(MockClusterApi::new().respond(Ok(ApiResponse::new(200, "{}"))));
        let handler = ClusterApiHandler::new(api);
        let body = br#"{"Method":"GET","URI":"/api/v1/namespaces/default","Body":""}"#;
        let msg = ClusterMessage::new(CommandType::ControlReq, body.to_vec()).with_message_id("m-1");

        let reply = handle_message(&handler, &msg).await.unwrap();

        assert_eq!(reply.head.message_id, "m-1");
        assert_eq!(
            parse_control_task_response(&reply.body).unwrap(),
            ControlTaskResponse::new(200, "{}")
        );
    }

    #[tokio::test]
    async fn test_handle_message_keeps_reply_on_error() {
        let api = Arc::new(MockClusterApi::new());
        let handler = ClusterApiHandler::new(api);
        let msg = ClusterMessage::new(CommandType::ControlReq, b"{}".to_vec());

        let reply = handle_message(&handler, &msg).await.unwrap();

        assert_eq!(
            parse_control_task_response(&reply.body).unwrap(),
            ControlTaskResponse::new(404, "")
        );
    }

    #[tokio::test]
    async fn test_handle_message_unsupported_has_no_reply() {
        let api = Arc::new(MockClusterApi::new());
        let handler = ClusterApiHandler::new(api.clone());
        let msg = ClusterMessage::new(CommandType::EdgeReport, Vec::new());

        assert!(handle_message(&handler, &msg).await.is_none());
        assert!(api.requests().is_empty());
    }
}

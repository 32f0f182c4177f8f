//! Core NATS subscriber and reply publisher.

use anyhow::Result;
use async_nats::{Client, ConnectOptions, Subject, Subscriber};

use crate::codec::encode_message;
use crate::message::ClusterMessage;

/// Connection to the message bus carrying cluster messages.
#[derive(Clone)]
pub struct NatsBridge {
    client: Client,
}

impl NatsBridge {
    /// Connect to NATS under the given client name.
    pub async fn connect(nats_url: &str, client_name: &str) -> Result<Self> {
        let client = ConnectOptions::new()
            .name(client_name)
            .connect(nats_url)
            .await?;

        tracing::info!(nats_url = %nats_url, client_name = %client_name, "Connected to NATS");

        Ok(Self { client })
    }

    /// Subscribe to the subject carrying cluster messages.
    pub async fn subscribe(&self, subject: &str) -> Result<Subscriber> {
        let subscriber = self.client.subscribe(subject.to_string()).await?;
        tracing::info!(subject = %subject, "Subscribed to cluster messages");
        Ok(subscriber)
    }

    /// Publish a reply to a request's reply subject.
    pub async fn reply(&self, reply_to: Subject, msg: &ClusterMessage) -> Result<()> {
        let payload = encode_message(msg)?;
        self.client
            .publish(reply_to, payload.into())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to publish reply: {}", e))?;
        Ok(())
    }
}

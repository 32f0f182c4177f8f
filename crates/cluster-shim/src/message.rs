//! Cluster message envelope and control task payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Command carried in a cluster message head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[default]
    Reserved,
    ClusterRegist,
    ClusterUnregist,
    NeighborRoute,
    SubTreeReq,
    SubTreeResp,
    /// Single control task request.
    ControlReq,
    /// Reply to a control task request.
    ControlResp,
    /// Batch of control tasks sharing verb and URI.
    ControlMultiReq,
    EdgeReport,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandType::Reserved => "Reserved",
            CommandType::ClusterRegist => "ClusterRegist",
            CommandType::ClusterUnregist => "ClusterUnregist",
            CommandType::NeighborRoute => "NeighborRoute",
            CommandType::SubTreeReq => "SubTreeReq",
            CommandType::SubTreeResp => "SubTreeResp",
            CommandType::ControlReq => "ControlReq",
            CommandType::ControlResp => "ControlResp",
            CommandType::ControlMultiReq => "ControlMultiReq",
            CommandType::EdgeReport => "EdgeReport",
        };
        f.write_str(name)
    }
}

/// Routing header of a cluster message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageHead {
    /// Correlation identifier, copied onto replies.
    #[serde(default)]
    pub message_id: String,

    /// Command kind.
    pub command: CommandType,

    /// Selector naming the target clusters.
    #[serde(default)]
    pub cluster_selector: String,

    /// Name of the cluster the message is addressed to.
    #[serde(default)]
    pub cluster_name: String,

    /// Name of the parent cluster that routed the message.
    #[serde(default)]
    pub parent_cluster_name: String,
}

/// Transport envelope exchanged with the message bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMessage {
    /// Message head.
    pub head: MessageHead,

    /// Opaque payload, decoded by a [`TaskExtractor`](crate::codec::TaskExtractor).
    #[serde(default)]
    pub body: Vec<u8>,
}

impl ClusterMessage {
    /// Create a message with the given command and payload.
    pub fn new(command: CommandType, body: Vec<u8>) -> Self {
        Self {
            head: MessageHead {
                command,
                ..Default::default()
            },
            body,
        }
    }

    /// Set the correlation identifier.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.head.message_id = message_id.into();
        self
    }

    /// Command kind of this message.
    pub fn command(&self) -> CommandType {
        self.head.command
    }
}

/// One cluster API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlTask {
    /// HTTP verb name (GET, POST, PUT, DELETE, PATCH).
    pub method: String,

    /// Fully formed request path, used verbatim.
    #[serde(rename = "URI")]
    pub uri: String,

    /// Request payload.
    #[serde(default)]
    pub body: String,
}

/// Several cluster API operations sharing verb and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlMultiTask {
    pub method: String,

    #[serde(rename = "URI")]
    pub uri: String,

    /// One payload per operation, executed in order.
    #[serde(default)]
    pub body: Vec<String>,
}

/// Status and raw body returned by the cluster API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ControlTaskResponse {
    pub status_code: i32,
    pub body: String,
}

impl ControlTaskResponse {
    pub fn new(status_code: i32, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

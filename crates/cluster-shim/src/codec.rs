//! Task extraction from cluster message payloads.

use serde::de::DeserializeOwned;

use crate::message::{ClusterMessage, ControlMultiTask, ControlTask};

/// Decodes the body of a cluster message into a typed task.
///
/// Extraction is all-or-nothing: a payload that does not fully decode
/// yields `None`.
pub trait TaskExtractor: Send + Sync {
    /// Decode a single control task.
    fn control_task(&self, msg: &ClusterMessage) -> Option<ControlTask>;

    /// Decode a control multi-task.
    fn control_multi_task(&self, msg: &ClusterMessage) -> Option<ControlMultiTask>;
}

/// JSON payload codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTaskExtractor;

impl JsonTaskExtractor {
    fn decode<T: DeserializeOwned>(&self, msg: &ClusterMessage, kind: &'static str) -> Option<T> {
        match serde_json::from_slice(&msg.body) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::error!(
                    message_id = %msg.head.message_id,
                    kind,
                    error = %e,
                    "Failed to decode task from cluster message"
                );
                None
            }
        }
    }
}

impl TaskExtractor for JsonTaskExtractor {
    fn control_task(&self, msg: &ClusterMessage) -> Option<ControlTask> {
        self.decode(msg, "ControlTask")
    }

    fn control_multi_task(&self, msg: &ClusterMessage) -> Option<ControlMultiTask> {
        self.decode(msg, "ControlMultiTask")
    }
}

/// Decode a cluster message envelope received from the bus.
pub fn decode_message(payload: &[u8]) -> serde_json::Result<ClusterMessage> {
    serde_json::from_slice(payload)
}

/// Encode a cluster message envelope for the bus.
pub fn encode_message(msg: &ClusterMessage) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(msg)
}

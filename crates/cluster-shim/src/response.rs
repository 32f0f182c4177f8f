//! Reply assembly.

use crate::message::{ClusterMessage, CommandType, ControlTaskResponse, MessageHead};

/// Encode a control task response payload.
pub fn control_task_response(status_code: i32, body: &str) -> Vec<u8> {
    // A struct of an integer and a string always serializes.
    serde_json::to_vec(&ControlTaskResponse::new(status_code, body)).unwrap_or_default()
}

/// Wrap a response payload into a reply correlated with the request head.
pub fn response(payload: Vec<u8>, head: &MessageHead) -> ClusterMessage {
    ClusterMessage {
        head: MessageHead {
            command: CommandType::ControlResp,
            ..head.clone()
        },
        body: payload,
    }
}

/// Read back a control task response payload.
pub fn parse_control_task_response(payload: &[u8]) -> serde_json::Result<ControlTaskResponse> {
    serde_json::from_slice(payload)
}

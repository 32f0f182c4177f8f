//! NATS messaging for cluster messages.

mod bridge;

pub use bridge::NatsBridge;

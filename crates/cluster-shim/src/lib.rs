//! Cluster Shim
//!
//! Translates control-task cluster messages into cluster API calls.
//!
//! This crate provides:
//! - Command dispatch for single and batched control tasks
//! - Cluster API capability with a reqwest-backed client
//! - JSON task extraction and reply assembly
//! - NATS subscriber and reply publisher

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod message;
pub mod nats;
pub mod response;
pub mod worker;

pub use client::{ClusterApi, HttpClusterApi};
pub use config::ShimConfig;
pub use error::{DispatchError, ShimError};
pub use handler::{ClusterApiHandler, Handler};
pub use message::{ClusterMessage, CommandType, ControlMultiTask, ControlTask, ControlTaskResponse};
pub use worker::Shim;

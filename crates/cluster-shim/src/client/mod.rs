//! Cluster API clients.

mod cluster_api;
mod http;

#[cfg(test)]
pub(crate) mod mock;

pub use cluster_api::{
    request_verb, ApiRequest, ApiResponse, ClusterApi, Verb, JSON_CONTENT_TYPE,
    JSON_PATCH_CONTENT_TYPE,
};
pub use http::HttpClusterApi;

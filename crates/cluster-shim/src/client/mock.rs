//! Recording cluster API for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ApiRequest, ApiResponse, ClusterApi};
use crate::error::ClusterApiError;

/// Records every request and replays scripted outcomes.
///
/// Once the script runs out, requests get `200 OK`.
#[derive(Default)]
pub struct MockClusterApi {
    requests: Mutex<Vec<ApiRequest>>,
    outcomes: Mutex<VecDeque<Result<ApiResponse, ClusterApiError>>>,
}

impl MockClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, outcome: Result<ApiResponse, ClusterApiError>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterApi for MockClusterApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClusterApiError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, "OK")))
    }
}

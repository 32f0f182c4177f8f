//! Control multi-task execution.

use std::sync::Arc;

use crate::client::{request_verb, ApiRequest, ClusterApi};
use crate::codec::TaskExtractor;
use crate::error::{ShimError, TaskKind};
use crate::message::ClusterMessage;

/// Executes a batch of same-verb, same-path requests in order.
pub struct BatchTaskExecutor {
    api: Arc<dyn ClusterApi>,
    extractor: Arc<dyn TaskExtractor>,
}

impl BatchTaskExecutor {
    pub fn new(api: Arc<dyn ClusterApi>, extractor: Arc<dyn TaskExtractor>) -> Self {
        Self { api, extractor }
    }

    /// Execute every item of the multi-task carried by `msg`.
    ///
    /// Extraction and method checks happen once, before any item runs.
    /// Item failures are logged and skipped; they never change the result.
    pub async fn execute(&self, msg: &ClusterMessage) -> Result<(), ShimError> {
        let task = self
            .extractor
            .control_multi_task(msg)
            .ok_or(ShimError::TaskNotFound(TaskKind::ControlMultiTask))?;

        let verb =
            request_verb(&task.method).ok_or_else(|| ShimError::MethodNotAllowed(task.method.clone()))?;

        let template = ApiRequest::new(verb).uri(task.uri);
        let total = task.body.len();
        let mut failed = 0usize;

        for (index, item) in task.body.into_iter().enumerate() {
            let request = template.clone().body(item);

            match self.api.execute(request).await {
                Ok(response) if response.is_success() => {
                    if !response.body.is_empty() {
                        tracing::debug!(
                            message_id = %msg.head.message_id,
                            index,
                            status = response.status,
                            body = %response.text(),
                            "Cluster API response"
                        );
                    }
                }
                Ok(response) => {
                    // TODO: re-queue failed items once a retry policy exists
                    failed += 1;
                    tracing::error!(
                        message_id = %msg.head.message_id,
                        index,
                        uri = %template.uri,
                        status = response.status,
                        body = %response.text(),
                        "Cluster API request failed"
                    );
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        message_id = %msg.head.message_id,
                        index,
                        uri = %template.uri,
                        error = %e,
                        "Cluster API request failed"
                    );
                }
            }
        }

        tracing::info!(
            message_id = %msg.head.message_id,
            method = %task.method,
            uri = %template.uri,
            items = total,
            failed,
            "Control multi-task finished"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClusterApi;
    use crate::client::{ApiResponse, Verb};
    use crate::codec::JsonTaskExtractor;
    use crate::error::ClusterApiError;
    use crate::message::CommandType;

    fn multi_message(method: &str, items: &[&str]) -> ClusterMessage {
        let payload = serde_json::json!({
            "Method": method,
            "URI": "/api/v1/namespaces/default/configmaps",
            "Body": items,
        });
        ClusterMessage::new(CommandType::ControlMultiReq, serde_json::to_vec(&payload).unwrap())
    }

    fn executor(api: &Arc<MockClusterApi>) -> BatchTaskExecutor {
        BatchTaskExecutor::new(api.clone(), Arc::new(JsonTaskExtractor))
    }

    #[tokio::test]
    async fn test_failed_item_does_not_stop_batch() {
        let api = Arc::new(
            MockClusterApi::new()
                .respond(Ok(ApiResponse::new(201, "created")))
                .respond(Err(ClusterApiError::Http("connection reset".into())))
                .respond(Ok(ApiResponse::new(201, ""))),
        );
        let msg = multi_message("POST", &["one", "two", "three"]);

        executor(&api).execute(&msg).await.unwrap();

        let requests = api.requests();
        let bodies: Vec<&[u8]> = requests.iter().map(|r| r.body.as_slice()).collect();
        assert_eq!(bodies, vec![&b"one"[..], &b"two"[..], &b"three"[..]]);
        assert!(requests
            .iter()
            .all(|r| r.verb == Verb::Post && r.uri == "/api/v1/namespaces/default/configmaps"));
    }

    #[tokio::test]
    async fn test_every_item_failing_still_succeeds() {
        let api = Arc::new(
            MockClusterApi::new()
                .respond(Ok(ApiResponse::new(500, "boom")))
                .respond(Ok(ApiResponse::new(403, "forbidden"))),
        );
        let msg = multi_message("PUT", &["a", "b"]);

        assert!(executor(&api).execute(&msg).await.is_ok());
        assert_eq!(api.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_method_runs_nothing() {
        let api = Arc::new(MockClusterApi::new());
        let msg = multi_message("HEAD", &["a", "b", "c"]);

        let err = executor(&api).execute(&msg).await.unwrap_err();

        assert!(matches!(err, ShimError::MethodNotAllowed(ref m) if m == "HEAD"));
        assert!(api.requests().is_empty());
    }

    #[test]
    fn test_missing_task_runs_nothing() {
        let api = Arc::new(MockClusterApi::new());
        let msg = ClusterMessage::new(CommandType::ControlMultiReq, br#"{"Method":"POST"}"#.to_vec());

        let err = tokio_test::block_on(executor(&api).execute(&msg)).unwrap_err();

        assert!(matches!(err, ShimError::TaskNotFound(TaskKind::ControlMultiTask)));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_patch_items_use_json_patch() {
        let api = Arc::new(MockClusterApi::new());
        let msg = multi_message("PATCH", &[r#"[{"op":"add","path":"/data/k","value":"v"}]"#]);

        executor(&api).execute(&msg).await.unwrap();

        assert_eq!(api.requests()[0].verb, Verb::JsonPatch);
    }

    #[tokio::test]
    async fn test_empty_batch_is_ok() {
        let api = Arc::new(MockClusterApi::new());
        let msg = multi_message("DELETE", &[]);

        executor(&api).execute(&msg).await.unwrap();

        assert!(api.requests().is_empty());
    }
}

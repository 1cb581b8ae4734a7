use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::error::AgentError;
use crate::protocol::{compute, ResultReport, Task, TaskResponse};

/// HTTP client for the orchestrator's internal task API.
pub struct CoordinatorClient {
    client: Client,
    base_url: String,
}

impl CoordinatorClient {
    pub fn new(base_url: &str) -> Self {
        CoordinatorClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_task(&self) -> Result<Task, AgentError> {
        let url = format!("{}/internal/task", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AgentError::UnexpectedStatus(response.status().as_u16()));
        }

        let envelope: TaskResponse = response.json().await?;
        Ok(envelope.task)
    }

    /// Reports a task outcome; `None` marks the result undefined.
    pub async fn submit_result(&self, id: &str, result: Option<f64>) -> Result<(), AgentError> {
        let url = format!("{}/internal/task/result", self.base_url);
        let report = ResultReport {
            id: id.to_string(),
            result,
        };

        let response = self.client.post(&url).json(&report).send().await?;
        if !response.status().is_success() {
            return Err(AgentError::UnexpectedStatus(response.status().as_u16()));
        }

        Ok(())
    }
}

/// One worker: fetch a task, compute it, report the result, sleep, repeat.
///
/// Transport failures are logged and retried after the poll interval — the
/// loop never terminates. A task lost between fetch and report is gone; the
/// orchestrator does not requeue it.
pub async fn run_worker(
    worker_id: usize,
    client: Arc<CoordinatorClient>,
    poll_interval: Duration,
) {
    tracing::info!("worker {} started", worker_id);

    loop {
        let task = match client.fetch_task().await {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("worker {}: failed to fetch task: {}", worker_id, e);
                sleep(poll_interval).await;
                continue;
            }
        };

        // Undefined outcomes still go back (as a null result) so the
        // orchestrator can close out the expression.
        let result = match compute(&task) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("worker {}: task {}: {}", worker_id, task.id, e);
                None
            }
        };
        tracing::info!(
            "worker {}: task {} -> {} {} {} = {:?}",
            worker_id,
            task.id,
            task.arg1,
            task.operation,
            task.arg2,
            result
        );

        if let Err(e) = client.submit_result(&task.id, result).await {
            tracing::warn!(
                "worker {}: failed to submit result for task {}: {}",
                worker_id,
                task.id,
                e
            );
        }

        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{router, AppState};
    use crate::protocol::ExpressionStatus;
    use crate::queue::TaskQueue;
    use crate::registry::ExpressionRegistry;

    #[test]
    fn base_url_is_normalized() {
        let client = CoordinatorClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn client_round_trip_against_live_orchestrator() {
        let state = AppState {
            registry: Arc::new(ExpressionRegistry::new()),
            queue: TaskQueue::new(10),
            task_wait_timeout: Duration::from_millis(200),
        };
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = CoordinatorClient::new(&format!("http://{}", addr));

        // Nothing queued: the bounded wait expires with 404.
        let err = client.fetch_task().await.unwrap_err();
        assert!(matches!(err, AgentError::UnexpectedStatus(404)));

        let id = state.registry.create("2+2").await.id;
        state
            .queue
            .enqueue(Task {
                id: id.clone(),
                arg1: 2.0,
                arg2: 2.0,
                operation: "add".to_string(),
            })
            .await;

        let task = client.fetch_task().await.unwrap();
        assert_eq!(task.id, id);

        let result = compute(&task).ok();
        assert_eq!(result, Some(4.0));
        client.submit_result(&task.id, result).await.unwrap();

        let stored = state.registry.get(&id).await.unwrap();
        assert_eq!(stored.status, ExpressionStatus::Completed);
        assert_eq!(stored.result, Some(4.0));

        // Reports for ids the orchestrator never issued are rejected.
        let err = client.submit_result("999", Some(1.0)).await.unwrap_err();
        assert!(matches!(err, AgentError::UnexpectedStatus(404)));
    }

    #[tokio::test]
    async fn undefined_outcome_still_completes_its_expression() {
        let state = AppState {
            registry: Arc::new(ExpressionRegistry::new()),
            queue: TaskQueue::new(10),
            task_wait_timeout: Duration::from_millis(200),
        };
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = CoordinatorClient::new(&format!("http://{}", addr));

        let id = state.registry.create("5/0").await.id;
        state
            .queue
            .enqueue(Task {
                id: id.clone(),
                arg1: 5.0,
                arg2: 0.0,
                operation: "div".to_string(),
            })
            .await;

        let task = client.fetch_task().await.unwrap();
        let result = compute(&task).ok();
        assert!(result.is_none());

        // The null result must survive the wire and close out the
        // expression with the NaN sentinel.
        client.submit_result(&task.id, result).await.unwrap();

        let stored = state.registry.get(&id).await.unwrap();
        assert_eq!(stored.status, ExpressionStatus::Completed);
        assert!(stored.result.unwrap().is_nan());
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::protocol::{Operation, Task};
use crate::queue::TaskQueue;
use crate::registry::ExpressionRegistry;

// Stub operands: expressions are not decomposed into real sub-tasks yet, so
// every dispatched task carries the same placeholder arithmetic.
const PLACEHOLDER_ARGS: (f64, f64) = (5.0, 10.0);

/// Background loop feeding the task queue.
///
/// Every tick it emits one placeholder task per pending expression that has
/// not been dispatched yet (task id = expression id, so reported results
/// reconcile against the registry). Enqueueing blocks while the queue is
/// full; that backpressure is the loop's only pacing besides the tick.
pub async fn run_producer(
    registry: Arc<ExpressionRegistry>,
    queue: TaskQueue,
    period: Duration,
) {
    tracing::info!("producer started, ticking every {:?}", period);

    let mut tick = interval(period);
    let mut dispatched: HashSet<String> = HashSet::new();

    loop {
        tick.tick().await;

        for id in registry.pending_ids().await {
            if !dispatched.insert(id.clone()) {
                continue;
            }
            let task = Task {
                id,
                arg1: PLACEHOLDER_ARGS.0,
                arg2: PLACEHOLDER_ARGS.1,
                operation: Operation::Add.as_str().to_string(),
            };
            tracing::debug!("dispatching task {}", task.id);
            queue.enqueue(task).await;
        }
    }
}

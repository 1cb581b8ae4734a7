use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::protocol::Task;

/// Bounded FIFO buffer of pending tasks.
///
/// The producer blocks on `enqueue` when the buffer is full (backpressure,
/// nothing is dropped). Concurrent `dequeue` callers serialize on the
/// receiver lock, so one fetch request maps to exactly one task — never split
/// or duplicated across two requesters.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<Task>,
    rx: Arc<Mutex<mpsc::Receiver<Task>>>,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        TaskQueue {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Waits for a free slot when the queue is at capacity.
    pub async fn enqueue(&self, task: Task) {
        // The receiver half lives inside this struct, so the channel only
        // closes once every handle is gone.
        if self.tx.send(task).await.is_err() {
            tracing::error!("task queue closed, dropping task");
        }
    }

    /// Takes the oldest task, waiting up to `timeout` for one to appear.
    /// Returns `None` if the wait expires.
    pub async fn dequeue(&self, timeout: Duration) -> Option<Task> {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
    }
}

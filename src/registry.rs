use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::protocol::{Expression, ExpressionStatus};

/// In-memory store of every expression the orchestrator has accepted.
///
/// Entries are created pending and transition to completed exactly once
/// logically; a duplicate report overwrites the result (last write wins).
/// Nothing is ever evicted — lifecycle ends with the process.
pub struct ExpressionRegistry {
    expressions: Mutex<HashMap<String, Expression>>,
    // Atomic counter instead of deriving ids from the map size, which would
    // collide under concurrent creates.
    next_id: AtomicU64,
}

impl ExpressionRegistry {
    pub fn new() -> Self {
        ExpressionRegistry {
            expressions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a new pending expression and returns it. Ids are sequential
    /// starting at "1".
    pub async fn create(&self, expression: &str) -> Expression {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let expr = Expression {
            id: id.clone(),
            status: ExpressionStatus::Pending,
            result: None,
            expression: expression.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.expressions.lock().await.insert(id, expr.clone());
        expr
    }

    pub async fn get(&self, id: &str) -> Option<Expression> {
        self.expressions.lock().await.get(id).cloned()
    }

    /// Snapshot of every known expression, any order.
    pub async fn list(&self) -> Vec<Expression> {
        self.expressions.lock().await.values().cloned().collect()
    }

    /// Ids of expressions still waiting for a result.
    pub async fn pending_ids(&self) -> Vec<String> {
        self.expressions
            .lock()
            .await
            .values()
            .filter(|e| e.status == ExpressionStatus::Pending)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Marks the expression completed with the reported result. An undefined
    /// outcome (`None`) is stored as the NaN sentinel. The update is atomic
    /// per id; repeat calls overwrite the result.
    pub async fn complete(&self, id: &str, result: Option<f64>) -> Result<Expression, ApiError> {
        let mut expressions = self.expressions.lock().await;
        let expr = expressions
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        expr.status = ExpressionStatus::Completed;
        expr.result = Some(result.unwrap_or(f64::NAN));
        Ok(expr.clone())
    }
}

impl Default for ExpressionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

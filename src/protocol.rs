use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// One unit of arithmetic work handed to a worker. Immutable once enqueued
/// and consumed exactly once; a task lost mid-flight is not requeued.
///
/// `operation` stays a string on the wire so an agent can recognize (and
/// reject) operation names it does not understand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionStatus {
    Pending,
    Completed,
}

/// A user-submitted computation request and its lifecycle state. Created
/// pending, completed at most once logically (last write wins on duplicate
/// reports), never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub id: String,
    pub status: ExpressionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    pub expression: String,
    pub created_at: String,
}

/// Transient report from a worker; only effect is completing the matching
/// expression.
///
/// `result` is `None` when the computation had no defined value — JSON
/// cannot carry NaN, so the sentinel crosses the wire as `null` and the
/// registry stores it as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultReport {
    pub id: String,
    pub result: Option<f64>,
}

// === Request/response envelopes ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionsResponse {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub expression: Expression,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
}

// === Arithmetic dispatch ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Operation::Add),
            "sub" => Some(Operation::Sub),
            "mul" => Some(Operation::Mul),
            "div" => Some(Operation::Div),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
        }
    }

    pub fn apply(&self, a: f64, b: f64) -> Result<f64, ComputeError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Sub => Ok(a - b),
            Operation::Mul => Ok(a * b),
            Operation::Div => {
                if b == 0.0 {
                    Err(ComputeError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }
        }
    }
}

/// Evaluate a task's operation on its operands.
pub fn compute(task: &Task) -> Result<f64, ComputeError> {
    let op = Operation::parse(&task.operation)
        .ok_or_else(|| ComputeError::UnsupportedOperation(task.operation.clone()))?;
    op.apply(task.arg1, task.arg2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(operation: &str, arg1: f64, arg2: f64) -> Task {
        Task {
            id: "t".to_string(),
            arg1,
            arg2,
            operation: operation.to_string(),
        }
    }

    #[test]
    fn computes_all_four_operations() {
        assert_eq!(compute(&task("add", 5.0, 10.0)).unwrap(), 15.0);
        assert_eq!(compute(&task("sub", 5.0, 10.0)).unwrap(), -5.0);
        assert_eq!(compute(&task("mul", 5.0, 10.0)).unwrap(), 50.0);
        assert_eq!(compute(&task("div", 10.0, 4.0)).unwrap(), 2.5);
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = compute(&task("modulo", 5.0, 10.0)).unwrap_err();
        assert_eq!(
            err,
            ComputeError::UnsupportedOperation("modulo".to_string())
        );
    }

    #[test]
    fn division_by_zero_is_undefined() {
        let err = compute(&task("div", 5.0, 0.0)).unwrap_err();
        assert_eq!(err, ComputeError::DivisionByZero);
    }

    #[test]
    fn undefined_outcomes_cross_the_wire_as_null() {
        // The agent reports anything it cannot evaluate as a null result.
        let report = ResultReport {
            id: "1".to_string(),
            result: compute(&task("div", 5.0, 0.0)).ok(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "1", "result": null }));

        let back: ResultReport = serde_json::from_value(json).unwrap();
        assert!(back.result.is_none());
    }

    #[test]
    fn defined_results_round_trip_through_json() {
        let report = ResultReport {
            id: "1".to_string(),
            result: compute(&task("add", 2.0, 2.0)).ok(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ResultReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result, Some(4.0));
    }

    #[test]
    fn operation_round_trips_through_wire_names() {
        for name in ["add", "sub", "mul", "div"] {
            assert_eq!(Operation::parse(name).unwrap().as_str(), name);
        }
        assert!(Operation::parse("addition").is_none());
    }

    #[test]
    fn pending_expression_omits_result_field() {
        let expr = Expression {
            id: "1".to_string(),
            status: ExpressionStatus::Pending,
            result: None,
            expression: "2+2".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("result").is_none());
    }
}

use serde_json::Value;
use zia_core::TaskResult;

use crate::{Result, RoutingError};

/// Status of the composite returned when any sub-task failed.
pub const COMPOSITE_STATUS: &str = "completed_with_errors_or_multiple";
/// Status of the composite returned in all-results mode.
pub const ALL_RESULTS_STATUS: &str = "completed";

/// Folds per-sub-task results into the single result returned to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    return_all_results: bool,
}

impl Aggregator {
    /// `return_all_results` keeps every result when all sub-tasks succeed,
    /// instead of only the last.
    #[must_use]
    pub fn new(return_all_results: bool) -> Self {
        Self { return_all_results }
    }

    /// Aggregates `results`, given in sub-task order.
    ///
    /// Any error yields the composite of all results. On full success the
    /// last result is returned unwrapped.
    ///
    /// # Errors
    /// Returns [`RoutingError::NoResultsProduced`] if `results` is empty.
    pub fn aggregate(&self, mut results: Vec<TaskResult>) -> Result<TaskResult> {
        if results.iter().any(TaskResult::is_error) {
            return Ok(composite(COMPOSITE_STATUS, results));
        }
        if self.return_all_results && results.len() > 1 {
            return Ok(composite(ALL_RESULTS_STATUS, results));
        }
        results.pop().ok_or(RoutingError::NoResultsProduced)
    }
}

fn composite(status: &str, results: Vec<TaskResult>) -> TaskResult {
    TaskResult::new()
        .with_field("status", Value::String(status.to_owned()))
        .with_field(
            "results",
            Value::Array(results.into_iter().map(TaskResult::into_value).collect()),
        )
}

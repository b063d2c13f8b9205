//! Multi-step execution: dispatch, strategy selection, and aggregation.

/// Folding sub-task results into one result
pub mod aggregate;
/// Single-task dispatch with lookup and timeout
pub mod dispatch;
/// Decompose, run and aggregate
pub mod engine;

pub use aggregate::{ALL_RESULTS_STATUS, Aggregator, COMPOSITE_STATUS};
pub use dispatch::dispatch;
pub use engine::ExecutionEngine;

/// Payload key carrying the previous step's result in sequential mode.
pub const CHAINING_KEY: &str = "input";

/// How the sub-tasks of a plan are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Independent sub-tasks, dispatched together and joined.
    Concurrent,
    /// Sub-tasks in order, each fed the previous result.
    Sequential,
}

//! Request analysis: classification of free text into tasks and
//! decomposition of tasks into sub-tasks.
//!
//! Both consult the oracle when one is configured and fall back to
//! deterministic behavior on any oracle failure.

/// Classification of free text into a task
pub mod classify;
/// Decomposition of a task into sub-tasks
pub mod decompose;
/// Timeout-bounded access to the oracle
pub mod oracle;
/// Tolerant parsing of oracle replies
pub mod parse;
/// Prompt construction
pub mod prompt;

pub use classify::{TaskClassifier, classify_by_keywords, keyword_capability};
pub use decompose::{SubTaskPlan, TaskDecomposer};
pub use oracle::OracleClient;
pub use parse::{parse_json, strip_code_fences};

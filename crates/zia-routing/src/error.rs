use std::io;
use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use zia_core::{Error as CoreError, TaskResult};

/// Result type for routing operations.
pub type Result<T> = StdResult<T, RoutingError>;

/// Errors raised inside the orchestrator.
///
/// None of these cross an entry point: oracle failures trigger fallbacks and
/// dispatch failures become error results via [`RoutingError::into_task_result`].
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Core error from a handler or oracle.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// IO error while reading or writing configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The oracle failed or timed out.
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The oracle replied with something that did not fit the expected shape.
    #[error("Malformed oracle response: {0}")]
    OracleMalformedResponse(String),

    /// No handler is registered for the type.
    #[error("No agent registered for type '{type_id}'. Available agents: {}", .known.join(", "))]
    AgentNotFound {
        /// Requested type id
        type_id: String,
        /// Every registered type id
        known: Vec<String>,
    },

    /// The handler returned an error.
    #[error("Agent '{type_id}' failed to handle the task")]
    HandlerFailure {
        /// Type id of the failing handler
        type_id: String,
        /// Description of the underlying failure
        details: String,
    },

    /// The handler did not finish within the dispatch timeout.
    #[error("Agent '{type_id}' did not respond in time")]
    DispatchTimeout {
        /// Type id of the slow handler
        type_id: String,
        /// Timeout that expired
        timeout_ms: u64,
    },

    /// Execution finished without any result.
    #[error("No results generated from task execution")]
    NoResultsProduced,

    /// A type id was registered twice.
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    /// A registration would corrupt lookups or oracle prompts.
    #[error("Invalid registration for '{type_id}': {reason}")]
    InvalidRegistration {
        /// Offending type id
        type_id: String,
        /// Why it was rejected
        reason: String,
    },
}

impl RoutingError {
    /// Whether this failure only triggers a fallback.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::OracleUnavailable(_) | Self::OracleMalformedResponse(_)
        )
    }

    /// Converts the error into the structured result returned to callers.
    #[must_use]
    pub fn into_task_result(self) -> TaskResult {
        let message = self.to_string();
        match self {
            Self::AgentNotFound { known, .. } => TaskResult::error(message).with_field(
                "available_agents",
                Value::Array(known.into_iter().map(Value::String).collect()),
            ),
            Self::HandlerFailure { details, .. } => TaskResult::error(message).with_details(details),
            Self::DispatchTimeout { timeout_ms, .. } => TaskResult::error(message)
                .with_details(format!("Timed out after {timeout_ms}ms")),
            other => TaskResult::error(message).with_details(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_not_found_lists_known_types() {
        let error = RoutingError::AgentNotFound {
            type_id: "weather".to_owned(),
            known: vec!["web_search".to_owned(), "llm_response".to_owned()],
        };

        let result = error.into_task_result();
        let message = result.error_message().unwrap();

        assert!(message.contains("'weather'"));
        assert!(message.contains("web_search, llm_response"));
        assert_eq!(
            result.get("available_agents"),
            Some(&json!(["web_search", "llm_response"]))
        );
    }

    #[test]
    fn test_handler_failure_carries_details() {
        let error = RoutingError::HandlerFailure {
            type_id: "web_search".to_owned(),
            details: "HTTP request failed: connection refused".to_owned(),
        };

        let result = error.into_task_result();

        assert!(result.error_message().unwrap().contains("web_search"));
        assert_eq!(
            result.get("details"),
            Some(&json!("HTTP request failed: connection refused"))
        );
    }

    #[test]
    fn test_soft_errors() {
        assert!(RoutingError::OracleUnavailable("down".to_owned()).is_soft());
        assert!(RoutingError::OracleMalformedResponse("junk".to_owned()).is_soft());
        assert!(!RoutingError::NoResultsProduced.is_soft());
    }
}

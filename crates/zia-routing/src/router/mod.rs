//! Single-task fast path: confirm the type, then dispatch once.

use std::time::Duration;

use zia_core::{Task, TaskResult};

use crate::Registry;
use crate::analyzer::prompt::routing_prompt;
use crate::analyzer::{OracleClient, strip_code_fences};
use crate::executor::dispatch;

/// Routes a single task to its handler without decomposition.
pub struct TaskRouter {
    registry: Registry,
    oracle: Option<OracleClient>,
    default_type: String,
    dispatch_timeout: Option<Duration>,
}

impl TaskRouter {
    /// Creates a router that trusts the task's own type.
    pub fn new(registry: Registry, default_type: impl Into<String>) -> Self {
        Self {
            registry,
            oracle: None,
            default_type: default_type.into(),
            dispatch_timeout: None,
        }
    }

    /// Lets `oracle` override the task's type with a registered one.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleClient) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Bounds each handler call.
    #[must_use]
    pub fn with_dispatch_timeout(mut self, dispatch_timeout: Option<Duration>) -> Self {
        self.dispatch_timeout = dispatch_timeout;
        self
    }

    /// Routes `task`. Always returns a result; failures become error results.
    pub async fn route(&self, mut task: Task) -> TaskResult {
        let suggested = match &self.oracle {
            Some(oracle) => self.suggest_type(oracle, &task).await,
            None => None,
        };

        let type_id = suggested
            .or_else(|| task.type_id().map(str::to_owned))
            .unwrap_or_else(|| self.default_type.clone());
        tracing::info!(type_id = %type_id, "Routing task");
        task.task_type = Some(type_id);

        match dispatch(&self.registry, &task, self.dispatch_timeout).await {
            Ok(result) => result,
            Err(error) => error.into_task_result(),
        }
    }

    async fn suggest_type(&self, oracle: &OracleClient, task: &Task) -> Option<String> {
        let reply = match oracle.ask(&routing_prompt(&self.registry, task)).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "Oracle routing failed, keeping task type");
                return None;
            }
        };

        match parse_type_suggestion(&reply) {
            Some(type_id) if self.registry.contains(type_id) => Some(type_id.to_owned()),
            _ => {
                tracing::warn!(%reply, "Oracle suggested an unregistered type, ignoring it");
                None
            }
        }
    }
}

/// First token of the reply with quotes, backticks and punctuation removed.
fn parse_type_suggestion(reply: &str) -> Option<&str> {
    let token = strip_code_fences(reply).split_whitespace().next()?;
    let token = token.trim_matches(|ch: char| !(ch.is_alphanumeric() || matches!(ch, '_' | '-')));
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_suggestion_parsing() {
        assert_eq!(parse_type_suggestion("web_search"), Some("web_search"));
        assert_eq!(parse_type_suggestion("\"data_retrieval\"."), Some("data_retrieval"));
        assert_eq!(parse_type_suggestion("`report_generation`, because..."), Some("report_generation"));
        assert_eq!(parse_type_suggestion("```\nllm_response\n```"), Some("llm_response"));
        assert_eq!(parse_type_suggestion("  ...  "), None);
    }
}

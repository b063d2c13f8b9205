use std::time::Duration;

use tokio::time::timeout;
use zia_core::{Task, TaskResult};

use crate::{Registry, Result, RoutingError};

/// Sends `task` to the handler registered for its type.
///
/// A missing type never reaches a handler. When `dispatch_timeout` is set the
/// handler call is abandoned once it expires.
///
/// # Errors
/// Returns [`RoutingError::AgentNotFound`] for an unregistered type,
/// [`RoutingError::HandlerFailure`] if the handler fails, and
/// [`RoutingError::DispatchTimeout`] if it runs out of time.
pub async fn dispatch(
    registry: &Registry,
    task: &Task,
    dispatch_timeout: Option<Duration>,
) -> Result<TaskResult> {
    let type_id = task.type_id().unwrap_or_default();

    let Some(entry) = registry.get(type_id) else {
        tracing::error!(type_id, "No agent registered for task type");
        return Err(RoutingError::AgentNotFound {
            type_id: type_id.to_owned(),
            known: registry.type_ids(),
        });
    };

    tracing::debug!(type_id, "Dispatching task");
    let call = entry.handler().handle(task);
    let outcome = match dispatch_timeout {
        Some(limit) => timeout(limit, call).await.map_err(|_| {
            tracing::error!(type_id, "Agent timed out after {limit:?}");
            RoutingError::DispatchTimeout {
                type_id: type_id.to_owned(),
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }
        })?,
        None => call.await,
    };

    outcome.map_err(|error| {
        tracing::error!(type_id, %error, "Agent failed to handle task");
        RoutingError::HandlerFailure {
            type_id: type_id.to_owned(),
            details: error.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::time::sleep;
    use zia_core::{CapabilityHandler, Error as CoreError, Result as CoreResult};

    struct Echo;

    #[async_trait]
    impl CapabilityHandler for Echo {
        fn description(&self) -> &str {
            "Echoes the payload."
        }

        async fn handle(&self, task: &Task) -> CoreResult<TaskResult> {
            Ok(TaskResult::from(task.payload.clone()))
        }
    }

    struct Broken;

    #[async_trait]
    impl CapabilityHandler for Broken {
        fn description(&self) -> &str {
            "Always fails."
        }

        async fn handle(&self, _task: &Task) -> CoreResult<TaskResult> {
            Err(CoreError::Handler("database offline".to_owned()))
        }
    }

    struct Slow;

    #[async_trait]
    impl CapabilityHandler for Slow {
        fn description(&self) -> &str {
            "Takes its time."
        }

        async fn handle(&self, _task: &Task) -> CoreResult<TaskResult> {
            sleep(Duration::from_millis(200)).await;
            Ok(TaskResult::report("late", json!([])))
        }
    }

    fn registry() -> Registry {
        Registry::builder()
            .register("echo", Arc::new(Echo))
            .unwrap()
            .register("broken", Arc::new(Broken))
            .unwrap()
            .register("slow", Arc::new(Slow))
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn test_dispatch_returns_handler_result_unmodified() {
        let task = Task::query("echo", "hello");
        let result = dispatch(&registry(), &task, None).await.unwrap();
        assert_eq!(result.as_map(), &task.payload);
    }

    #[tokio::test]
    async fn test_unknown_type_lists_known_types() {
        let error = dispatch(&registry(), &Task::new("weather"), None)
            .await
            .unwrap_err();

        match error {
            RoutingError::AgentNotFound { type_id, known } => {
                assert_eq!(type_id, "weather");
                assert_eq!(known, vec!["echo", "broken", "slow"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_error_becomes_failure_with_details() {
        let error = dispatch(&registry(), &Task::new("broken"), None)
            .await
            .unwrap_err();

        assert!(
            matches!(error, RoutingError::HandlerFailure { ref details, .. } if details.contains("database offline"))
        );
    }

    #[tokio::test]
    async fn test_timeout_applies_only_when_set() {
        let registry = registry();
        let task = Task::new("slow");

        let error = dispatch(&registry, &task, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert!(matches!(error, RoutingError::DispatchTimeout { timeout_ms: 10, .. }));

        let result = dispatch(&registry, &task, None).await.unwrap();
        assert_eq!(result.report_text(), Some("late"));
    }
}

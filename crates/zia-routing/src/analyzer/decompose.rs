use serde_json::{Value, from_value};
use zia_core::Task;

use super::oracle::OracleClient;
use super::parse::parse_json;
use super::prompt::decomposition_prompt;
use crate::executor::{CHAINING_KEY, ExecutionStrategy};
use crate::{Registry, Result, RoutingError};

/// Ordered, non-empty list of sub-tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTaskPlan {
    tasks: Vec<Task>,
}

impl SubTaskPlan {
    /// Plan that runs `task` as-is.
    #[must_use]
    pub fn single(task: Task) -> Self {
        Self { tasks: vec![task] }
    }

    /// Wraps `tasks`, or `None` if there are none.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Option<Self> {
        (!tasks.is_empty()).then_some(Self { tasks })
    }

    /// Number of sub-tasks, always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sub-tasks in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the plan.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Concurrent iff there is more than one sub-task and none after the
    /// first declares the chaining key.
    #[must_use]
    pub fn strategy(&self) -> ExecutionStrategy {
        let chained = self
            .tasks
            .iter()
            .skip(1)
            .any(|task| task.declares(CHAINING_KEY));

        if self.tasks.len() > 1 && !chained {
            ExecutionStrategy::Concurrent
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

/// Splits a task into sub-tasks, single level only.
pub struct TaskDecomposer {
    registry: Registry,
    oracle: Option<OracleClient>,
    max_subtasks: usize,
}

impl TaskDecomposer {
    /// Creates an identity decomposer that accepts at most `max_subtasks` sub-tasks
    /// once an oracle is attached.
    pub fn new(registry: Registry, max_subtasks: usize) -> Self {
        Self {
            registry,
            oracle: None,
            max_subtasks: max_subtasks.max(1),
        }
    }

    /// Asks `oracle` for decompositions.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleClient) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Decomposes `task`. Any oracle problem yields the identity plan.
    pub async fn decompose(&self, task: &Task) -> SubTaskPlan {
        let Some(oracle) = &self.oracle else {
            return SubTaskPlan::single(task.clone());
        };

        match self.decompose_with_oracle(oracle, task).await {
            Ok(plan) => {
                tracing::info!(sub_tasks = plan.len(), "Decomposed task via oracle");
                plan
            }
            Err(error) => {
                tracing::warn!(%error, "Decomposition failed, running task as a single step");
                SubTaskPlan::single(task.clone())
            }
        }
    }

    async fn decompose_with_oracle(&self, oracle: &OracleClient, task: &Task) -> Result<SubTaskPlan> {
        let reply = oracle
            .ask(&decomposition_prompt(&self.registry, task))
            .await?;
        let tasks = parse_sub_tasks(&reply, task)?;

        if tasks.len() > self.max_subtasks {
            return Err(RoutingError::OracleMalformedResponse(format!(
                "{} sub-tasks exceeds the limit of {}",
                tasks.len(),
                self.max_subtasks
            )));
        }

        SubTaskPlan::from_tasks(tasks).ok_or_else(|| {
            RoutingError::OracleMalformedResponse("empty decomposition".to_owned())
        })
    }
}

/// Every element must be an object shaped like a task; sub-tasks that omit
/// `user` or `context` inherit them from `parent`.
fn parse_sub_tasks(reply: &str, parent: &Task) -> Result<Vec<Task>> {
    let Value::Array(elements) = parse_json(reply)? else {
        return Err(RoutingError::OracleMalformedResponse(format!(
            "expected a JSON array: {reply}"
        )));
    };

    elements
        .into_iter()
        .map(|element| {
            if !element.is_object() {
                return Err(RoutingError::OracleMalformedResponse(format!(
                    "sub-task is not an object: {element}"
                )));
            }
            let mut sub_task: Task = from_value(element).map_err(|error| {
                RoutingError::OracleMalformedResponse(format!("invalid sub-task: {error}"))
            })?;

            if sub_task.user.is_none() {
                sub_task.user.clone_from(&parent.user);
            }
            if sub_task.context.is_empty() {
                sub_task.context.clone_from(&parent.context);
            }
            Ok(sub_task)
        })
        .collect()
}

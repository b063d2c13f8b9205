use std::time::Duration;

use futures::stream::{self, StreamExt as _};
use tracing::Instrument as _;
use uuid::Uuid;
use zia_core::{Task, TaskResult};

use super::aggregate::Aggregator;
use super::dispatch::dispatch;
use super::{CHAINING_KEY, ExecutionStrategy};
use crate::analyzer::{OracleClient, SubTaskPlan, TaskDecomposer};
use crate::{ExecutionConfig, Registry};

/// Runs a task end to end: decompose, dispatch every sub-task, aggregate.
pub struct ExecutionEngine {
    registry: Registry,
    decomposer: TaskDecomposer,
    aggregator: Aggregator,
    max_concurrent: usize,
    dispatch_timeout: Option<Duration>,
}

impl ExecutionEngine {
    /// Creates an engine without an oracle, so every task runs as one step.
    pub fn new(registry: Registry, config: &ExecutionConfig) -> Self {
        Self {
            decomposer: TaskDecomposer::new(registry.clone(), config.max_subtasks),
            registry,
            aggregator: Aggregator::new(config.return_all_results),
            max_concurrent: config.max_concurrent.max(1),
            dispatch_timeout: config.dispatch_timeout(),
        }
    }

    /// Uses `oracle` for decomposition.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleClient) -> Self {
        self.decomposer = self.decomposer.with_oracle(oracle);
        self
    }

    /// Executes `task`. Every failure is folded into the returned result.
    pub async fn execute(&self, task: Task) -> TaskResult {
        let span = tracing::info_span!(
            "execute",
            request_id = %Uuid::new_v4(),
            task_type = task.type_id().unwrap_or_default()
        );
        self.execute_plan(task).instrument(span).await
    }

    async fn execute_plan(&self, task: Task) -> TaskResult {
        let plan = self.decomposer.decompose(&task).await;
        let strategy = plan.strategy();
        tracing::info!(sub_tasks = plan.len(), ?strategy, "Executing task");

        let results = match strategy {
            ExecutionStrategy::Concurrent => self.run_concurrent(plan).await,
            ExecutionStrategy::Sequential => self.run_sequential(plan).await,
        };
        let failed = results.iter().filter(|result| result.is_error()).count();

        match self.aggregator.aggregate(results) {
            Ok(result) => {
                tracing::info!(failed, "Task execution finished");
                result
            }
            Err(error) => {
                tracing::error!(%error, "Aggregation failed");
                error.into_task_result()
            }
        }
    }

    /// Fork-join over every sub-task; results keep plan order.
    async fn run_concurrent(&self, plan: SubTaskPlan) -> Vec<TaskResult> {
        stream::iter(plan.into_tasks())
            .map(|sub_task| async move { self.run_step(&sub_task).await })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Step `i` receives step `i - 1`'s result under the chaining key, or no
    /// key at all when that step failed.
    async fn run_sequential(&self, plan: SubTaskPlan) -> Vec<TaskResult> {
        let mut results: Vec<TaskResult> = Vec::with_capacity(plan.len());

        for (index, template) in plan.into_tasks().into_iter().enumerate() {
            let sub_task = if index == 0 {
                template
            } else {
                let previous = results.last().filter(|result| !result.is_error());
                if previous.is_none() {
                    tracing::warn!(
                        step = index,
                        "Previous step failed, dispatching without chained input"
                    );
                }
                template.chained(CHAINING_KEY, previous)
            };
            results.push(self.run_step(&sub_task).await);
        }

        results
    }

    async fn run_step(&self, sub_task: &Task) -> TaskResult {
        dispatch(&self.registry, sub_task, self.dispatch_timeout)
            .await
            .unwrap_or_else(|error| error.into_task_result().with_sub_task(sub_task))
    }
}

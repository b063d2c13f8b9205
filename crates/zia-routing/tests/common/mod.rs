//! Common test utilities for zia-routing integration tests
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::env;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::{EnvFilter, fmt};
use zia_core::{CapabilityHandler, Error, IgnoreLock as _, Result, Task, TaskResult};
use zia_providers::MockOracle;
use zia_routing::{OracleClient, Registry};

/// Prompt fragment identifying classification requests.
pub const CLASSIFY_PROMPT: &str = "Classify the following user message";
/// Prompt fragment identifying decomposition requests.
pub const DECOMPOSE_PROMPT: &str = "Decompose the following task";
/// Prompt fragment identifying routing requests.
pub const ROUTE_PROMPT: &str = "determine the best agent type";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests (idempotent).
/// Honors `RUST_LOG` if set, otherwise defaults to "debug".
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_owned());
        if fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_test_writer()
            .try_init()
            .is_err()
        {
            // tracing already initialized in this process
        }
    });
}

enum Outcome {
    Succeed(TaskResult),
    Fail(String),
}

/// Handler that records every task it receives.
pub struct RecordingHandler {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Task>>>,
}

impl RecordingHandler {
    /// Succeeds with `result`.
    pub fn succeeding(result: TaskResult) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Succeed(result),
            delay: None,
            calls: Arc::default(),
        })
    }

    /// Succeeds with `{report: text, data: []}`.
    pub fn reporting(text: &str) -> Arc<Self> {
        Self::succeeding(report(text))
    }

    /// Succeeds with `{report: text}` after `delay`.
    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Succeed(report(text)),
            delay: Some(delay),
            calls: Arc::default(),
        })
    }

    /// Always fails with `message`.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Fail(message.to_owned()),
            delay: None,
            calls: Arc::default(),
        })
    }

    /// Tasks received so far, in arrival order.
    pub fn calls(&self) -> Vec<Task> {
        self.calls.lock_ignore_poison().clone()
    }

    /// The single task received; panics if there were zero or several.
    pub fn only_call(&self) -> Task {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl CapabilityHandler for RecordingHandler {
    fn description(&self) -> &str {
        "Records every task it receives."
    }

    async fn handle(&self, task: &Task) -> Result<TaskResult> {
        self.calls.lock_ignore_poison().push(task.clone());

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Succeed(result) => Ok(result.clone()),
            Outcome::Fail(message) => Err(Error::Handler(message.clone())),
        }
    }
}

/// `{report: text, data: []}`.
pub fn report(text: &str) -> TaskResult {
    TaskResult::report(text, json!([]))
}

/// Builds a registry from `(type id, handler)` pairs.
pub fn registry(handlers: &[(&str, &Arc<RecordingHandler>)]) -> Registry {
    handlers
        .iter()
        .fold(Registry::builder(), |builder, (type_id, handler)| {
            let handler: Arc<RecordingHandler> = Arc::clone(handler);
            builder.register(*type_id, handler).unwrap()
        })
        .build()
}

/// Wraps a mock oracle for direct use with the analyzers.
pub fn oracle_client(oracle: &MockOracle) -> OracleClient {
    OracleClient::new(Arc::new(oracle.clone()), Duration::from_secs(1))
}

/// Oracle that answers decomposition prompts with `sub_tasks`.
pub fn decomposing_oracle(sub_tasks: &Value) -> MockOracle {
    MockOracle::new().with_response(DECOMPOSE_PROMPT, sub_tasks.to_string())
}

/// Payload of `task` as a JSON value.
pub fn payload(task: &Task) -> Value {
    Value::Object(task.payload.clone())
}

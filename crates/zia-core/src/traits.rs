use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, Task, TaskResult};

/// A component that performs one capability.
///
/// Handlers are registered under a type id and receive every task dispatched
/// to that id. Returning an error is always safe: the orchestrator converts
/// it into a structured error result for the caller.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Single-line description shown to the oracle when choosing a type.
    fn description(&self) -> &str;

    /// Performs the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be completed.
    async fn handle(&self, task: &Task) -> Result<TaskResult>;
}

/// Text returned by an oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    /// Raw generated text
    pub text: String,
}

impl OracleResponse {
    /// Wraps generated text.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self { text: text.into() }
    }
}

/// External classification and decomposition service.
///
/// The orchestrator consults it opportunistically; every failure is soft and
/// triggers a deterministic fallback.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Returns the identifier of this oracle.
    fn name(&self) -> &'static str;

    /// Generates text for the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or its reply cannot be read.
    async fn generate(&self, prompt: &str) -> Result<OracleResponse>;
}

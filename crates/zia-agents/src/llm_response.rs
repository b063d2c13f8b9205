use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use zia_core::{CapabilityHandler, Oracle, Result, Task, TaskResult};

/// Directly answers user queries with the language model.
///
/// Built after the oracle so the registry can be assembled in one step.
pub struct LlmResponseAgent {
    oracle: Arc<dyn Oracle>,
}

impl LlmResponseAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Directly answers user queries using the Gemini LLM for conversational or general-purpose responses.";

    /// Creates an agent that answers through `oracle`.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl CapabilityHandler for LlmResponseAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, task: &Task) -> Result<TaskResult> {
        let Some(prompt) = task.query_text().filter(|text| !text.is_empty()) else {
            return Ok(TaskResult::report("No input provided.", Value::Array(Vec::new())));
        };

        tracing::debug!(oracle = self.oracle.name(), "Answering with language model");
        let response = self.oracle.generate(prompt).await?;

        Ok(TaskResult::report(response.text, Value::Array(Vec::new())))
    }
}

/// Stands in for [`LlmResponseAgent`] when no oracle is configured.
#[derive(Debug, Default)]
pub struct UnavailableLlmAgent;

impl UnavailableLlmAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Fallback LLM agent when Gemini is unavailable.";
}

#[async_trait]
impl CapabilityHandler for UnavailableLlmAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, _task: &Task) -> Result<TaskResult> {
        Ok(TaskResult::report(
            "LLM is not available.",
            Value::Array(Vec::new()),
        ))
    }
}

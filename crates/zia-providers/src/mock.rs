//! Mock oracle for testing classification and decomposition.
//!
//! Allows defining canned replies for prompt patterns, enabling end-to-end
//! testing of the orchestrator without real API calls.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use zia_core::{Error, IgnoreLock as _, Oracle, OracleResponse, Result};

/// Reply storage: pattern and reply, in insertion order.
type ResponseList = Arc<Mutex<Vec<(String, String)>>>;

/// Oracle that returns pre-defined replies based on prompt patterns.
#[derive(Clone, Default)]
pub struct MockOracle {
    /// Replies keyed by a substring of the prompt
    responses: ResponseList,
    /// Reply used when no pattern matches
    default_response: Arc<Mutex<Option<String>>>,
    /// When set, every call fails with this message
    failure: Arc<Mutex<Option<String>>>,
    /// Artificial latency applied before replying
    delay: Option<Duration>,
    /// Prompts received, for verification
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockOracle {
    /// Create a new mock oracle with no canned replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` to any prompt containing `pattern`.
    ///
    /// Patterns are tried in the order they were added.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .lock_ignore_poison()
            .push((pattern.into(), response.into()));
        self
    }

    /// Set a reply for prompts that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.lock_ignore_poison() = Some(response.into());
        self
    }

    /// Make every call fail, simulating an unreachable service.
    #[must_use]
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.lock_ignore_poison() = Some(message.into());
        self
    }

    /// Delay every reply, simulating a slow service.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the call history (list of all prompts received).
    #[must_use]
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock_ignore_poison().clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history.lock_ignore_poison().len()
    }

    /// Find a matching reply for the given prompt.
    fn find_response(&self, prompt: &str) -> Option<String> {
        self.responses
            .lock_ignore_poison()
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl Oracle for MockOracle {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<OracleResponse> {
        self.call_history.lock_ignore_poison().push(prompt.to_owned());

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let failure = self.failure.lock_ignore_poison().clone();
        if let Some(message) = failure {
            return Err(Error::Oracle(message));
        }

        let text = self
            .find_response(prompt)
            .or_else(|| self.default_response.lock_ignore_poison().clone())
            .unwrap_or_default();

        Ok(OracleResponse::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_oracle_substring_match() {
        let oracle = MockOracle::new().with_response("Classify", "{\"type\": \"web_search\"}");

        let response = oracle.generate("Classify the following message").await.unwrap();
        assert_eq!(response.text, "{\"type\": \"web_search\"}");
    }

    #[tokio::test]
    async fn test_mock_oracle_first_pattern_wins() {
        let oracle = MockOracle::new()
            .with_response("decompose", "first")
            .with_response("decompose it", "second");

        let response = oracle.generate("please decompose it").await.unwrap();
        assert_eq!(response.text, "first");
    }

    #[tokio::test]
    async fn test_mock_oracle_default_response() {
        let oracle = MockOracle::new().with_default_response("llm_response");

        let response = oracle.generate("unmatched").await.unwrap();
        assert_eq!(response.text, "llm_response");
    }

    #[tokio::test]
    async fn test_mock_oracle_failing() {
        let oracle = MockOracle::new()
            .with_default_response("ignored")
            .failing("service unavailable");

        let result = oracle.generate("anything").await;
        assert!(matches!(result, Err(Error::Oracle(message)) if message == "service unavailable"));
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_oracle_call_history() {
        let oracle = MockOracle::new();

        oracle.generate("first prompt").await.unwrap();
        oracle.generate("second prompt").await.unwrap();

        let history = oracle.get_call_history();
        assert_eq!(history, vec!["first prompt", "second prompt"]);
    }
}

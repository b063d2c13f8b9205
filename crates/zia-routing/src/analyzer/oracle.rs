use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use zia_core::Oracle;

use crate::{Result, RoutingError};

/// Shared handle to the oracle with a per-call timeout.
///
/// Every failure mode maps onto the two soft errors, so callers only need to
/// decide which fallback to take.
#[derive(Clone)]
pub struct OracleClient {
    oracle: Arc<dyn Oracle>,
    timeout: Duration,
}

impl OracleClient {
    /// Wraps `oracle`, bounding each call by `timeout`.
    pub fn new(oracle: Arc<dyn Oracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Name of the underlying oracle.
    pub fn name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Sends `prompt` and returns the trimmed reply text.
    ///
    /// # Errors
    /// Returns [`RoutingError::OracleUnavailable`] if the oracle fails or times
    /// out, and [`RoutingError::OracleMalformedResponse`] if it replies with
    /// nothing.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        tracing::debug!(oracle = self.name(), "Prompting oracle:\n{prompt}");

        let response = timeout(self.timeout, self.oracle.generate(prompt))
            .await
            .map_err(|_| {
                RoutingError::OracleUnavailable(format!(
                    "no reply within {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|error| RoutingError::OracleUnavailable(error.to_string()))?;

        let text = response.text.trim();
        tracing::debug!(oracle = self.name(), "Oracle replied: {text}");

        if text.is_empty() {
            return Err(RoutingError::OracleMalformedResponse(
                "empty reply".to_owned(),
            ));
        }
        Ok(text.to_owned())
    }
}

use serde_json::Value;
use zia_core::{Capability, JsonMap, Task};

use super::oracle::OracleClient;
use super::parse::parse_json;
use super::prompt::classification_prompt;
use crate::{Registry, Result, RoutingError};

/// Keyword rule: the capability implied by `text`, if any.
///
/// Rules are checked in priority order on the lower-cased text, so
/// "search the sales data" is a web search.
pub fn keyword_capability(text: &str) -> Option<Capability> {
    let lowered = text.to_lowercase();

    if lowered.contains("search") {
        Some(Capability::WebSearch)
    } else if lowered.contains("data") || lowered.contains("fetch") {
        Some(Capability::DataRetrieval)
    } else if lowered.contains("report") {
        Some(Capability::ReportGeneration)
    } else if lowered.contains("dashboard") || lowered.contains("analy") {
        Some(Capability::AnalysisDashboard)
    } else {
        None
    }
}

/// Deterministic classification used whenever the oracle can't be.
///
/// The payload is always `{query: text}`; `user` and `context` are attached
/// unchanged.
pub fn classify_by_keywords(
    text: &str,
    user: Option<String>,
    context: JsonMap,
    default_type: &str,
) -> Task {
    let task_type = keyword_capability(text)
        .map_or_else(|| default_type.to_owned(), |capability| capability.as_str().to_owned());

    Task::query(task_type, text)
        .with_user(user)
        .with_context(context)
}

/// Turns free text into a task.
pub struct TaskClassifier {
    registry: Registry,
    oracle: Option<OracleClient>,
    default_type: String,
}

impl TaskClassifier {
    /// Creates a keyword-only classifier.
    pub fn new(registry: Registry, default_type: impl Into<String>) -> Self {
        Self {
            registry,
            oracle: None,
            default_type: default_type.into(),
        }
    }

    /// Consults `oracle` before falling back to keyword rules.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleClient) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Classifies `text`. Never fails: oracle problems fall back to keyword rules.
    pub async fn classify(&self, text: &str, user: Option<String>, context: JsonMap) -> Task {
        if let Some(oracle) = &self.oracle {
            match self.classify_with_oracle(oracle, text).await {
                Ok(task) => {
                    tracing::info!(
                        task_type = task.type_id().unwrap_or_default(),
                        "Classified request via oracle"
                    );
                    return task.with_user(user).with_context(context);
                }
                Err(error) => {
                    tracing::warn!(%error, "Oracle classification failed, falling back to keyword rules");
                }
            }
        }

        let task = classify_by_keywords(text, user, context, &self.default_type);
        tracing::info!(
            task_type = task.type_id().unwrap_or_default(),
            "Classified request by keyword rules"
        );
        task
    }

    async fn classify_with_oracle(&self, oracle: &OracleClient, text: &str) -> Result<Task> {
        let reply = oracle
            .ask(&classification_prompt(&self.registry, text))
            .await?;
        parse_classification(&reply)
    }
}

/// Accepts only `{"type": <non-empty string>, "payload": <object>}`.
fn parse_classification(reply: &str) -> Result<Task> {
    let Value::Object(mut object) = parse_json(reply)? else {
        return Err(malformed("expected a JSON object", reply));
    };

    let task_type = match object.remove("type") {
        Some(Value::String(task_type)) if !task_type.is_empty() => task_type,
        _ => return Err(malformed("missing or invalid \"type\"", reply)),
    };
    let Some(Value::Object(payload)) = object.remove("payload") else {
        return Err(malformed("missing or invalid \"payload\"", reply));
    };

    Ok(Task::new(task_type).with_payload(payload))
}

fn malformed(reason: &str, reply: &str) -> RoutingError {
    RoutingError::OracleMalformedResponse(format!("{reason}: {reply}"))
}

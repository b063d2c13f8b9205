use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, to_value};

use crate::Error;

/// JSON object used for payloads, contexts, and results.
pub type JsonMap = Map<String, Value>;

/// Key under which a result reports failure.
pub const ERROR_KEY: &str = "error";
/// Key carrying the stringified cause of a failure.
pub const DETAILS_KEY: &str = "details";
/// Key tagging an error result with the sub-task that produced it.
pub const SUB_TASK_KEY: &str = "sub_task";
/// Key holding the human-readable summary of a successful result.
pub const REPORT_KEY: &str = "report";
/// Key holding the structured data of a successful result.
pub const DATA_KEY: &str = "data";
/// Payload key holding the request text.
pub const QUERY_KEY: &str = "query";

/// The built-in capabilities a request can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Web search through an external search API
    WebSearch,
    /// Data retrieval from databases, APIs, or files
    DataRetrieval,
    /// Report generation from data or queries
    ReportGeneration,
    /// Data analysis and dashboards
    AnalysisDashboard,
    /// Free-text answers from the language model
    LlmResponse,
}

impl Capability {
    /// Every capability, in registration order.
    pub const ALL: [Self; 5] = [
        Self::WebSearch,
        Self::DataRetrieval,
        Self::ReportGeneration,
        Self::AnalysisDashboard,
        Self::LlmResponse,
    ];

    /// Type id used to register and dispatch this capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::DataRetrieval => "data_retrieval",
            Self::ReportGeneration => "report_generation",
            Self::AnalysisDashboard => "analysis_dashboard",
            Self::LlmResponse => "llm_response",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| Error::UnknownCapability(value.to_owned()))
    }
}

/// A typed unit of work.
///
/// `task_type` selects the handler; `payload` is handler-specific and opaque
/// to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Discriminator selecting the handler
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Handler-specific arguments
    #[serde(default)]
    pub payload: JsonMap,
    /// Requesting user, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Delivery context (channel and similar)
    #[serde(default)]
    pub context: JsonMap,
}

impl Task {
    /// Creates a task of the given type with an empty payload.
    pub fn new<T: Into<String>>(task_type: T) -> Self {
        Self {
            task_type: Some(task_type.into()),
            ..Self::default()
        }
    }

    /// Creates a task whose payload is `{query: text}`.
    pub fn query<T: Into<String>, Q: Into<String>>(task_type: T, text: Q) -> Self {
        Self::new(task_type).with_payload_value(QUERY_KEY, Value::String(text.into()))
    }

    /// Replaces the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: JsonMap) -> Self {
        self.payload = payload;
        self
    }

    /// Sets a single payload entry.
    #[must_use]
    pub fn with_payload_value<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Sets the requesting user.
    #[must_use]
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    /// Replaces the delivery context.
    #[must_use]
    pub fn with_context(mut self, context: JsonMap) -> Self {
        self.context = context;
        self
    }

    /// Type id, if the task carries a non-empty one.
    pub fn type_id(&self) -> Option<&str> {
        self.task_type.as_deref().filter(|kind| !kind.is_empty())
    }

    /// The `query` payload entry when it is a string.
    pub fn query_text(&self) -> Option<&str> {
        self.payload.get(QUERY_KEY).and_then(Value::as_str)
    }

    /// Whether the payload already declares `key`.
    pub fn declares(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }

    /// Builds a fresh copy of this task for chained dispatch.
    ///
    /// With `input` present the copy's payload carries it under `key`,
    /// replacing any earlier value; without it the key is removed. `self` is
    /// never modified.
    #[must_use]
    pub fn chained(&self, key: &str, input: Option<&TaskResult>) -> Self {
        let mut copy = self.clone();
        match input {
            Some(result) => {
                copy.payload
                    .insert(key.to_owned(), Value::Object(result.as_map().clone()));
            }
            None => {
                copy.payload.remove(key);
            }
        }
        copy
    }

    /// JSON rendering used in prompts and error tags.
    pub fn to_json(&self) -> Value {
        to_value(self).unwrap_or_default()
    }
}

/// Outcome of a dispatch: either a success mapping or an error mapping.
///
/// By convention an error result carries `error` and optionally `details`;
/// anything else is a success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskResult(JsonMap);

impl TaskResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `{report, data}` success result.
    pub fn report<T: Into<String>>(report: T, data: Value) -> Self {
        Self::new()
            .with_field(REPORT_KEY, Value::String(report.into()))
            .with_field(DATA_KEY, data)
    }

    /// Creates an `{error}` result.
    pub fn error<T: Into<String>>(message: T) -> Self {
        Self::new().with_field(ERROR_KEY, Value::String(message.into()))
    }

    /// Adds `details` to the result.
    #[must_use]
    pub fn with_details<T: Into<String>>(self, details: T) -> Self {
        self.with_field(DETAILS_KEY, Value::String(details.into()))
    }

    /// Tags the result with the sub-task that produced it.
    #[must_use]
    pub fn with_sub_task(self, task: &Task) -> Self {
        self.with_field(SUB_TASK_KEY, task.to_json())
    }

    /// Sets an arbitrary field.
    #[must_use]
    pub fn with_field<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Whether this result reports a failure.
    pub fn is_error(&self) -> bool {
        self.0.contains_key(ERROR_KEY)
    }

    /// The error message, when the result is an error carrying a string.
    pub fn error_message(&self) -> Option<&str> {
        self.0.get(ERROR_KEY).and_then(Value::as_str)
    }

    /// The report text, when present.
    pub fn report_text(&self) -> Option<&str> {
        self.0.get(REPORT_KEY).and_then(Value::as_str)
    }

    /// Looks up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the underlying mapping.
    pub fn as_map(&self) -> &JsonMap {
        &self.0
    }

    /// Consumes the result into its mapping.
    pub fn into_map(self) -> JsonMap {
        self.0
    }

    /// Consumes the result into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<JsonMap> for TaskResult {
    fn from(map: JsonMap) -> Self {
        Self(map)
    }
}

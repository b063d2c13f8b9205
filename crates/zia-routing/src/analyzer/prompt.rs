use serde_json::Value;
use zia_core::Task;

use crate::Registry;
use crate::executor::CHAINING_KEY;

/// Lists every registered type as `- type: description`.
fn type_listing(registry: &Registry) -> String {
    registry
        .entries()
        .map(|entry| format!("- {}: {}", entry.type_id(), entry.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the oracle to turn a message into one `{type, payload}` object.
pub fn classification_prompt(registry: &Registry, text: &str) -> String {
    format!(
        "Classify the following user message into a task object with keys \"type\" and \"payload\".\n\
         Possible types and their descriptions:\n\
         {listing}\n\
         The \"payload\" must be an object, typically with a \"query\" key holding the original text or its key entities.\n\
         Message: {message}\n\
         Respond with only a JSON object. Example: {{\"type\": \"web_search\", \"payload\": {{\"query\": \"search term\"}}}}",
        listing = type_listing(registry),
        message = Value::String(text.to_owned()),
    )
}

/// Prompt asking the oracle to split a task into an ordered list of sub-tasks.
pub fn decomposition_prompt(registry: &Registry, task: &Task) -> String {
    format!(
        "Decompose the following task into an ordered list of sub-tasks for a multi-agent workflow.\n\
         Possible types and their descriptions:\n\
         {listing}\n\
         Each sub-task must be a JSON object with a \"type\" chosen from the list above and a \"payload\" object.\n\
         If a sub-task needs the output of the sub-task before it, include an \"{CHAINING_KEY}\" key in its payload; \
         the previous result will be placed there.\n\
         If the task does not require decomposition, return a list containing only the original task.\n\
         Respond with only a JSON array. Example: [{{\"type\": \"data_retrieval\", \"payload\": {{\"source\": \"db\"}}}}, \
         {{\"type\": \"report_generation\", \"payload\": {{\"{CHAINING_KEY}\": null}}}}]\n\
         Original task: {task}",
        listing = type_listing(registry),
        task = task.to_json(),
    )
}

/// Prompt asking the oracle to name the single best type for a task.
pub fn routing_prompt(registry: &Registry, task: &Task) -> String {
    format!(
        "Given the following task, determine the best agent type to handle it.\n\
         Possible agent types and their descriptions:\n\
         {listing}\n\
         Task: {task}\n\
         Respond with only the agent type.",
        listing = type_listing(registry),
        task = task.to_json(),
    )
}

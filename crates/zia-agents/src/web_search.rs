use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, to_value};
use zia_core::{CapabilityHandler, Error, Result, Task, TaskResult};

/// Google Custom Search JSON API endpoint.
const SEARCH_API_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Results requested when the payload doesn't say.
pub const DEFAULT_RESULTS: usize = 3;
/// Most results the search API returns per request.
pub const MAX_RESULTS: usize = 10;
/// Snippets longer than this are shortened.
const SNIPPET_LIMIT: usize = 300;

/// A single formatted search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Page URL
    #[serde(default)]
    pub link: String,
    /// Page excerpt
    #[serde(default)]
    pub snippet: String,
}

/// Response payload returned by the search API.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Hits; absent when nothing matched.
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// Handles web search queries through the Google Custom Search API.
pub struct WebSearchAgent {
    /// HTTP client for API requests.
    client: Client,
    /// Search API key.
    api_key: Option<String>,
    /// Custom search engine id.
    cse_id: Option<String>,
    /// Results requested when the payload doesn't say.
    default_results: usize,
    /// Upper bound on requested results.
    max_results: usize,
}

impl WebSearchAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Handles web search queries using external search APIs (Google, Bing, etc.), returns summarized and formatted results for Slack. Supports configurable number of results.";

    /// Creates a search agent with the given credentials.
    pub fn new(api_key: Option<String>, cse_id: Option<String>) -> Self {
        Self {
            client: Client::default(),
            api_key,
            cse_id,
            default_results: DEFAULT_RESULTS,
            max_results: MAX_RESULTS,
        }
    }

    /// Sets the default and maximum number of results.
    ///
    /// The maximum never exceeds what the API allows per request.
    #[must_use]
    pub fn with_limits(mut self, default_results: usize, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS);
        self.default_results = default_results.clamp(1, self.max_results);
        self
    }

    /// Reads `num_results` from the payload, accepting whole numbers (`5` or
    /// `5.0`) and numeric strings.
    fn requested_results(&self, task: &Task) -> usize {
        match task.payload.get("num_results") {
            Some(Value::Number(number)) => number
                .as_u64()
                .and_then(|count| usize::try_from(count).ok())
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|value| value.fract().abs() < f64::EPSILON)
                        .and_then(|value| value.to_string().parse().ok())
                })
                .unwrap_or(self.default_results),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(self.default_results),
            _ => self.default_results,
        }
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchItem>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::MissingApiKey("GOOGLE_SEARCH_API_KEY".to_owned()))?;
        let cse_id = self
            .cse_id
            .as_deref()
            .ok_or_else(|| Error::MissingApiKey("GOOGLE_CSE_ID".to_owned()))?;
        let count = count.to_string();

        let response = self
            .client
            .get(SEARCH_API_URL)
            .query(&[
                ("key", api_key),
                ("cx", cse_id),
                ("q", query),
                ("num", count.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Handler(format!(
                "Search API error {status}: {error_text}"
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.items)
    }
}

/// Shortens a snippet to the display limit, on character boundaries.
pub(crate) fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() > SNIPPET_LIMIT {
        let kept: String = snippet.chars().take(SNIPPET_LIMIT - 3).collect();
        format!("{kept}...")
    } else {
        snippet.to_owned()
    }
}

/// Renders hits as a numbered Slack list: `*1. <link|title>*` then the snippet.
pub(crate) fn format_results(items: &[SearchItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "*{}. <{}|{}>*\n{}",
                index + 1,
                item.link,
                item.title,
                item.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl CapabilityHandler for WebSearchAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, task: &Task) -> Result<TaskResult> {
        let Some(query) = task.query_text().filter(|text| !text.trim().is_empty()) else {
            return Ok(TaskResult::report(
                "No search query provided.",
                Value::Array(Vec::new()),
            ));
        };

        let requested = self.requested_results(task).max(1);
        let capped = requested > self.max_results;
        let count = requested.min(self.max_results);

        tracing::info!(query, count, "Running web search");
        let items: Vec<SearchItem> = self
            .search(query, count)
            .await?
            .into_iter()
            .map(|item| SearchItem {
                snippet: truncate_snippet(&item.snippet),
                ..item
            })
            .collect();

        if items.is_empty() {
            return Ok(TaskResult::report(
                "No results found.",
                Value::Array(Vec::new()),
            ));
        }

        let mut report = format_results(&items);
        if capped {
            report = format!(
                "_(Note: Only the first {} results are shown due to API limits.)_\n\n{report}",
                self.max_results
            );
        }

        Ok(TaskResult::report(report, to_value(items)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str, link: &str, snippet: &str) -> SearchItem {
        SearchItem {
            title: title.to_owned(),
            link: link.to_owned(),
            snippet: snippet.to_owned(),
        }
    }

    #[test]
    fn test_truncate_snippet_short_unchanged() {
        assert_eq!(truncate_snippet("short text"), "short text");
    }

    #[test]
    fn test_truncate_snippet_long_is_shortened() {
        let long = "a".repeat(SNIPPET_LIMIT + 50);
        let truncated = truncate_snippet(&long);

        assert_eq!(truncated.chars().count(), SNIPPET_LIMIT);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_snippet_respects_char_boundaries() {
        let long = "é".repeat(SNIPPET_LIMIT + 1);
        let truncated = truncate_snippet(&long);

        assert_eq!(truncated.chars().count(), SNIPPET_LIMIT);
    }

    #[test]
    fn test_format_results_numbers_items() {
        let formatted = format_results(&[
            item("Rust", "https://rust-lang.org", "A language"),
            item("Tokio", "https://tokio.rs", "A runtime"),
        ]);

        assert_eq!(
            formatted,
            "*1. <https://rust-lang.org|Rust>*\nA language\n\n*2. <https://tokio.rs|Tokio>*\nA runtime"
        );
    }

    #[test]
    fn test_requested_results_parsing() {
        let agent = WebSearchAgent::new(None, None);

        let numeric = Task::query("web_search", "q").with_payload_value("num_results", json!(5));
        let textual = Task::query("web_search", "q").with_payload_value("num_results", json!("7"));
        let garbage = Task::query("web_search", "q").with_payload_value("num_results", json!("many"));
        let whole = Task::query("web_search", "q").with_payload_value("num_results", json!(5.0));
        let fractional = Task::query("web_search", "q").with_payload_value("num_results", json!(2.5));

        assert_eq!(agent.requested_results(&numeric), 5);
        assert_eq!(agent.requested_results(&textual), 7);
        assert_eq!(agent.requested_results(&garbage), DEFAULT_RESULTS);
        assert_eq!(agent.requested_results(&whole), 5);
        assert_eq!(agent.requested_results(&fractional), DEFAULT_RESULTS);
        assert_eq!(agent.requested_results(&Task::query("web_search", "q")), DEFAULT_RESULTS);
    }

    #[test]
    fn test_with_limits_clamps_to_api_maximum() {
        let agent = WebSearchAgent::new(None, None).with_limits(20, 50);

        assert_eq!(agent.max_results, MAX_RESULTS);
        assert_eq!(agent.default_results, MAX_RESULTS);
    }

    #[tokio::test]
    async fn test_missing_query_reports_without_calling_api() {
        let agent = WebSearchAgent::new(None, None);

        let result = agent.handle(&Task::new("web_search")).await.unwrap();

        assert_eq!(result.report_text(), Some("No search query provided."));
        assert_eq!(result.get("data"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_failure() {
        let agent = WebSearchAgent::new(None, Some("cse".to_owned()));

        let result = agent.handle(&Task::query("web_search", "rust")).await;

        assert!(matches!(result, Err(Error::MissingApiKey(_))));
    }
}

use async_trait::async_trait;
use serde_json::Value;
use zia_core::{CapabilityHandler, Result, Task, TaskResult};

/// Payload key under which the orchestrator passes a predecessor's result.
const CHAINED_INPUT_KEY: &str = "input";

/// Handles data retrieval from databases, APIs, or files.
///
/// No backend is wired yet; the handler acknowledges the request.
#[derive(Debug, Default)]
pub struct DataRetrievalAgent;

impl DataRetrievalAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Handles data retrieval from databases, APIs, or files. Supports SQL/NoSQL queries, API calls, and returns structured data for downstream agents.";
}

#[async_trait]
impl CapabilityHandler for DataRetrievalAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, _task: &Task) -> Result<TaskResult> {
        Ok(TaskResult::report(
            "DataRetrievalAgent is a stub. Implement your logic here.",
            Value::Array(Vec::new()),
        ))
    }
}

/// Generates reports from provided data or queries.
///
/// When chained after another step, the predecessor's report text is folded
/// into the generated report.
#[derive(Debug, Default)]
pub struct ReportGenerationAgent;

impl ReportGenerationAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Generates reports from provided data or queries. Supports Markdown, PDF, and CSV output. Can use LLM for summarization and content generation.";
}

#[async_trait]
impl CapabilityHandler for ReportGenerationAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, task: &Task) -> Result<TaskResult> {
        let upstream = task
            .payload
            .get(CHAINED_INPUT_KEY)
            .and_then(|input| input.get("report"))
            .and_then(Value::as_str);

        let report = match upstream {
            Some(text) => format!(
                "ReportGenerationAgent is a stub. Source material:\n{text}"
            ),
            None => "ReportGenerationAgent is a stub. Implement your logic here.".to_owned(),
        };

        Ok(TaskResult::report(report, Value::Array(Vec::new())))
    }
}

/// Performs data analysis and generates dashboards or visualizations.
#[derive(Debug, Default)]
pub struct AnalysisDashboardAgent;

impl AnalysisDashboardAgent {
    /// Static description shown to the oracle.
    pub const DESCRIPTION: &'static str = "Performs data analysis and generates dashboards or visualizations. Accepts structured data, applies statistical or pattern analysis, and outputs results as Slack-formatted summaries or images.";
}

#[async_trait]
impl CapabilityHandler for AnalysisDashboardAgent {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, _task: &Task) -> Result<TaskResult> {
        Ok(TaskResult::report(
            "AnalysisDashboardAgent is a stub. Implement your logic here.",
            Value::Array(Vec::new()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_stub_agents_report_success() {
        let task = Task::query("data_retrieval", "fetch sales");

        let data = DataRetrievalAgent.handle(&task).await.unwrap();
        let dashboard = AnalysisDashboardAgent.handle(&task).await.unwrap();

        assert!(!data.is_error());
        assert!(!dashboard.is_error());
        assert!(data.report_text().unwrap().contains("DataRetrievalAgent"));
    }

    #[tokio::test]
    async fn test_report_generation_uses_chained_input() {
        let task = Task::new("report_generation")
            .with_payload_value("input", json!({"report": "Q3 revenue rose 4%", "data": []}));

        let result = ReportGenerationAgent.handle(&task).await.unwrap();

        assert!(result.report_text().unwrap().contains("Q3 revenue rose 4%"));
    }

    #[tokio::test]
    async fn test_report_generation_without_input() {
        let result = ReportGenerationAgent
            .handle(&Task::new("report_generation"))
            .await
            .unwrap();

        assert_eq!(
            result.report_text(),
            Some("ReportGenerationAgent is a stub. Implement your logic here.")
        );
    }
}

//! Capability handlers registered with the Zia orchestrator.
//!
//! Each handler implements one capability; the orchestrator decides which
//! handler sees a task and converts any handler failure into a structured
//! error result.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Oracle-backed free-text answers.
mod llm_response;
/// Placeholder handlers for capabilities without a backend yet.
mod stubs;
/// Google Custom Search handler.
mod web_search;

pub use llm_response::{LlmResponseAgent, UnavailableLlmAgent};
pub use stubs::{AnalysisDashboardAgent, DataRetrievalAgent, ReportGenerationAgent};
pub use web_search::{SearchItem, WebSearchAgent};

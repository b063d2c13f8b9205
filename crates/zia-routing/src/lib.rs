//! Task orchestration core: classification, decomposition, routing, and
//! multi-step execution over a registry of capability handlers.
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

pub mod analyzer;
pub mod config;
/// Routing error taxonomy
pub mod error;
pub mod executor;
/// Facade over classification, routing and execution
pub mod orchestrator;
pub mod registry;
pub mod router;

pub use analyzer::{
    OracleClient, SubTaskPlan, TaskClassifier, TaskDecomposer, classify_by_keywords,
    keyword_capability, strip_code_fences,
};
pub use config::{ExecutionConfig, OracleConfig, RouterConfig, RoutingConfig, SearchConfig};
pub use error::{Result, RoutingError};
pub use executor::{
    ALL_RESULTS_STATUS, Aggregator, CHAINING_KEY, COMPOSITE_STATUS, ExecutionEngine,
    ExecutionStrategy,
};
pub use orchestrator::Orchestrator;
pub use registry::{Registry, RegistryBuilder, RegistryEntry};
pub use router::TaskRouter;

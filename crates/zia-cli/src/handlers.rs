//! Command handlers for CLI operations

use anyhow::{Context as _, Result};
use serde_json::{Value, to_string_pretty};
use std::fs::OpenOptions;
use std::io::{Write as _, stderr, stdout};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{
    EnvFilter, Registry as Subscriber, fmt, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};
use zia_agents::{
    AnalysisDashboardAgent, DataRetrievalAgent, LlmResponseAgent, ReportGenerationAgent,
    UnavailableLlmAgent, WebSearchAgent,
};
use zia_core::{Capability, CapabilityHandler, JsonMap, Oracle};
use zia_providers::GeminiOracle;
use zia_routing::{Orchestrator, Registry, RoutingConfig};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "zia_routing=info,zia_agents=info,zia_cli=info";
/// Placeholder printed instead of configured secrets.
const REDACTED: &str = "<redacted>";

/// Installs the tracing subscriber, writing to `log_file` or stderr.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let subscriber = Subscriber::default().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(Arc::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
        }
        None => subscriber.with(fmt::layer().with_writer(stderr)).init(),
    }

    Ok(())
}

/// Loads configuration from `path`, or from `~/.zia/config.toml`.
///
/// # Errors
/// Returns an error if an explicitly given file cannot be loaded.
pub fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    if let Some(path) = path {
        return RoutingConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    Ok(RoutingConfig::load_or_create().unwrap_or_else(|error| {
        tracing::warn!("Failed to load config from ~/.zia/config.toml: {error}");
        tracing::warn!("Using default configuration");
        RoutingConfig::default()
    }))
}

/// Delivery context as the messaging gateway would attach it.
pub fn request_context(channel: Option<String>) -> JsonMap {
    let mut context = JsonMap::new();
    if let Some(channel) = channel {
        context.insert("channel".to_owned(), Value::String(channel));
    }
    context
}

/// Builds the oracle if it is enabled and has an API key.
fn build_oracle(config: &RoutingConfig) -> Option<Arc<dyn Oracle>> {
    if !config.oracle.enabled {
        tracing::info!("Oracle disabled in configuration");
        return None;
    }

    let Some(api_key) = config.oracle_api_key() else {
        tracing::warn!("GEMINI_API_KEY not set, running without an oracle");
        return None;
    };

    match GeminiOracle::new(api_key) {
        Ok(oracle) => Some(Arc::new(oracle.with_model(config.oracle.model.clone()))),
        Err(error) => {
            tracing::warn!("Failed to create oracle: {error}");
            None
        }
    }
}

/// Registers every built-in capability. `oracle` is created first so the
/// `llm_response` handler can be wired in the same step.
///
/// # Errors
/// Returns an error if a registration is rejected.
fn build_registry(config: &RoutingConfig, oracle: Option<&Arc<dyn Oracle>>) -> Result<Registry> {
    let llm_response: Arc<dyn CapabilityHandler> = match oracle {
        Some(oracle) => Arc::new(LlmResponseAgent::new(Arc::clone(oracle))),
        None => Arc::new(UnavailableLlmAgent),
    };
    let web_search = WebSearchAgent::new(config.search_api_key(), config.search_cse_id())
        .with_limits(config.search.default_results, config.search.max_results);

    let registry = Registry::builder()
        .register_capability(Capability::WebSearch, Arc::new(web_search))?
        .register_capability(Capability::DataRetrieval, Arc::new(DataRetrievalAgent))?
        .register_capability(Capability::ReportGeneration, Arc::new(ReportGenerationAgent))?
        .register_capability(Capability::AnalysisDashboard, Arc::new(AnalysisDashboardAgent))?
        .register_capability(Capability::LlmResponse, llm_response)?
        .build();

    tracing::debug!(types = ?registry.type_ids(), "Registry built");
    Ok(registry)
}

fn build_orchestrator(config: &RoutingConfig) -> Result<Orchestrator> {
    let oracle = build_oracle(config);
    let registry = build_registry(config, oracle.as_ref())?;
    Ok(Orchestrator::new(config, registry, oracle))
}

/// Handle the classify command: print the classified task.
///
/// # Errors
/// Returns an error if the registry cannot be built or output fails.
pub async fn handle_classify(
    config: &RoutingConfig,
    text: &str,
    user: Option<String>,
    context: JsonMap,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let task = orchestrator.classify(text, user, context).await;
    write_json(&task.to_json())
}

/// Handle the route command: classify, then dispatch to a single agent.
///
/// # Errors
/// Returns an error if the registry cannot be built or output fails.
pub async fn handle_route(
    config: &RoutingConfig,
    text: &str,
    user: Option<String>,
    context: JsonMap,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let task = orchestrator.classify(text, user, context).await;
    let result = orchestrator.route(task).await;
    write_json(&result.into_value())
}

/// Handle the run command: classify, then execute with decomposition.
///
/// # Errors
/// Returns an error if the registry cannot be built or output fails.
pub async fn handle_run(
    config: &RoutingConfig,
    text: &str,
    user: Option<String>,
    context: JsonMap,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let result = orchestrator.process_request(text, user, context).await;
    write_json(&result.into_value())
}

/// Output current configuration. If `full` is true, prints full TOML.
///
/// # Errors
/// Returns an error if serialization or output fails.
pub fn handle_config(config: &RoutingConfig, full: bool) -> Result<()> {
    let mut out = stdout().lock();

    if full {
        let mut shown = config.clone();
        if shown.oracle.api_key.is_some() {
            shown.oracle.api_key = Some(REDACTED.to_owned());
        }
        if shown.search.api_key.is_some() {
            shown.search.api_key = Some(REDACTED.to_owned());
        }
        writeln!(out, "{}", toml::to_string_pretty(&shown)?)?;
        return Ok(());
    }

    let status = |set: bool| if set { "Set" } else { "Not set" };
    writeln!(out, "Configuration:")?;
    writeln!(out, "  Default type: {}", config.routing.default_type)?;
    writeln!(
        out,
        "  Oracle: {} ({})",
        if config.oracle.enabled { "enabled" } else { "disabled" },
        config.oracle.model
    )?;
    writeln!(out, "  Gemini API Key: {}", status(config.oracle_api_key().is_some()))?;
    writeln!(out, "  Search API Key: {}", status(config.search_api_key().is_some()))?;
    writeln!(out, "  Max Sub-tasks: {}", config.execution.max_subtasks)?;
    writeln!(out, "  Max Concurrent: {}", config.execution.max_concurrent)?;
    writeln!(
        out,
        "  Dispatch Timeout: {}",
        config
            .execution
            .dispatch_timeout()
            .map_or_else(|| "disabled".to_owned(), |timeout| format!("{}s", timeout.as_secs()))
    )?;
    Ok(())
}

fn write_json(value: &Value) -> Result<()> {
    let mut out = stdout().lock();
    writeln!(out, "{}", to_string_pretty(value)?)?;
    Ok(())
}

use std::sync::Arc;

use zia_core::{JsonMap, Oracle, Task, TaskResult};

use crate::{
    ExecutionEngine, OracleClient, Registry, RoutingConfig, TaskClassifier, TaskRouter,
};

/// Entry points used by the messaging surface: classify, route, execute.
///
/// All three are total. They never fail; problems come back as error results
/// or, for classification, as the keyword fallback.
pub struct Orchestrator {
    registry: Registry,
    classifier: TaskClassifier,
    router: TaskRouter,
    engine: ExecutionEngine,
}

impl Orchestrator {
    /// Wires every component over one `registry`.
    ///
    /// `oracle` is shared by the classifier, the decomposer and the router;
    /// without one each of them uses its deterministic fallback.
    pub fn new(config: &RoutingConfig, registry: Registry, oracle: Option<Arc<dyn Oracle>>) -> Self {
        let default_type = config.routing.default_type.clone();
        let dispatch_timeout = config.execution.dispatch_timeout();

        let mut classifier = TaskClassifier::new(registry.clone(), default_type.clone());
        let mut router = TaskRouter::new(registry.clone(), default_type)
            .with_dispatch_timeout(dispatch_timeout);
        let mut engine = ExecutionEngine::new(registry.clone(), &config.execution);

        if let Some(oracle) = oracle {
            let client = OracleClient::new(oracle, config.oracle.timeout());
            tracing::info!(oracle = client.name(), "Oracle enabled");
            classifier = classifier.with_oracle(client.clone());
            router = router.with_oracle(client.clone());
            engine = engine.with_oracle(client);
        } else {
            tracing::info!("No oracle configured, using deterministic fallbacks");
        }

        Self {
            registry,
            classifier,
            router,
            engine,
        }
    }

    /// The registry every dispatch goes through.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Turns free text into a task.
    pub async fn classify(&self, text: &str, user: Option<String>, context: JsonMap) -> Task {
        self.classifier.classify(text, user, context).await
    }

    /// Single-task path.
    pub async fn route(&self, task: Task) -> TaskResult {
        self.router.route(task).await
    }

    /// Multi-step path.
    pub async fn execute(&self, task: Task) -> TaskResult {
        self.engine.execute(task).await
    }

    /// Classifies `text` and executes the resulting task.
    pub async fn process_request(
        &self,
        text: &str,
        user: Option<String>,
        context: JsonMap,
    ) -> TaskResult {
        let task = self.classify(text, user, context).await;
        self.execute(task).await
    }
}

//! The `network-topology` scheduler plugin.

use std::sync::Arc;

use netgrid_framework::{Arguments, FrameworkResult, Plugin, PluginRegistry, Session};
use netgrid_topology::{SwitchTreeEvaluator, TopologyEvaluator};
use tracing::debug;

use crate::cache::SelectionCache;
use crate::config::{NetworkTopologyConfig, PLUGIN_NAME};
use crate::scorer::TopologyScorer;

/// Biases placement toward node subsets spanning few leaf switches.
///
/// One instance lives for one session and exclusively owns that session's
/// selection cache. The scorer registered on session open shares the cache
/// through an `Arc`; nothing else reads or writes it.
pub struct NetworkTopologyPlugin {
    config: Arc<NetworkTopologyConfig>,
    cache: Arc<SelectionCache>,
    evaluator: Arc<dyn TopologyEvaluator>,
}

impl NetworkTopologyPlugin {
    /// Create a plugin backed by the in-tree switch tree evaluator.
    pub fn new(arguments: &Arguments) -> Self {
        Self::with_evaluator(arguments, Arc::new(SwitchTreeEvaluator::new()))
    }

    /// Create a plugin backed by a custom evaluator.
    pub fn with_evaluator(arguments: &Arguments, evaluator: Arc<dyn TopologyEvaluator>) -> Self {
        Self {
            config: Arc::new(NetworkTopologyConfig::from_arguments(arguments)),
            cache: Arc::new(SelectionCache::new()),
            evaluator,
        }
    }

    pub fn config(&self) -> &NetworkTopologyConfig {
        &self.config
    }

    pub fn weight(&self) -> i64 {
        self.config.weight
    }

    pub fn cache(&self) -> &SelectionCache {
        &self.cache
    }

    /// A scorer over `ssn`'s jobs sharing this plugin's state.
    pub fn scorer(&self, ssn: &Session) -> TopologyScorer {
        TopologyScorer::new(
            self.config.clone(),
            self.cache.clone(),
            self.evaluator.clone(),
            ssn.jobs().clone(),
        )
    }
}

impl Plugin for NetworkTopologyPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn on_session_open(&self, ssn: &mut Session) {
        debug!(session = ssn.uid(), "network topology plugin opening");
        let scorer = Arc::new(self.scorer(ssn));
        ssn.add_batch_node_order_fn(self.name(), scorer);
    }

    fn on_session_close(&self, ssn: &mut Session) {
        debug!(
            session = ssn.uid(),
            cached_jobs = self.cache.len(),
            "network topology plugin closing"
        );
    }
}

/// Plugin builder for the framework registry.
pub fn build(arguments: Arguments) -> Box<dyn Plugin> {
    Box::new(NetworkTopologyPlugin::new(&arguments))
}

/// Register the plugin builder under [`PLUGIN_NAME`].
pub fn register(registry: &mut PluginRegistry) -> FrameworkResult<()> {
    registry.register(PLUGIN_NAME, build)
}

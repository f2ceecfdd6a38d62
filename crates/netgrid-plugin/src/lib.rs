//! netgrid-plugin — the `network-topology` scheduler plugin.
//!
//! Steers a job's tasks onto nodes that sit under as few leaf switches as
//! possible. The first time a job is scored in a session, the plugin asks a
//! [`TopologyEvaluator`](netgrid_topology::TopologyEvaluator) for a compact
//! node subset sized to the job's minimum member count and caches it; every
//! later task of that job scores the same subset.
//!
//! # Architecture
//!
//! ```text
//! NetworkTopologyPlugin (one per session)
//!   ├── NetworkTopologyConfig (path, weight)
//!   ├── SelectionCache (job → selection, per-job locks)
//!   └── on_session_open ──> TopologyScorer (BatchNodeOrder)
//!                             └── TopologyEvaluator (validate, eval_nodes_tree)
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod plugin;
pub mod scorer;

pub use cache::{SelectionCache, SelectionResult};
pub use config::{
    DEFAULT_WEIGHT, NETWORK_EXTRA_SCORE, NetworkTopologyConfig, PLUGIN_NAME, PLUGIN_WEIGHT,
    TOPOLOGY_CONFIG_PATH,
};
pub use error::NetworkTopologyError;
pub use plugin::{NetworkTopologyPlugin, build, register};
pub use scorer::TopologyScorer;

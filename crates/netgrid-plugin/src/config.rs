//! Typed plugin configuration.
//!
//! Parsed once from the plugin's [`Arguments`]. Parsing never fails: a bad
//! value is logged and the documented default is kept, so a misconfigured
//! plugin degrades to scoring nothing instead of breaking the session.
//!
//! ```toml
//! [[tiers.plugins]]
//! name = "network-topology"
//! arguments = { "topology-config-path" = "/etc/netgrid/topology.toml", "network-topology.weight" = 10 }
//! ```

use std::path::PathBuf;

use netgrid_framework::Arguments;
use tracing::{debug, warn};

/// Plugin name used for registration.
pub const PLUGIN_NAME: &str = "network-topology";

/// Argument key: path to the switch record file.
pub const TOPOLOGY_CONFIG_PATH: &str = "topology-config-path";

/// Argument key: score multiplier.
pub const PLUGIN_WEIGHT: &str = "network-topology.weight";

/// Base score added to every selected node.
pub const NETWORK_EXTRA_SCORE: i64 = 1;

/// Weight used when none (or an invalid one) is configured.
pub const DEFAULT_WEIGHT: i64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkTopologyConfig {
    /// Switch record location. `None` disables scoring.
    pub topology_config_path: Option<PathBuf>,
    pub weight: i64,
}

impl Default for NetworkTopologyConfig {
    fn default() -> Self {
        Self {
            topology_config_path: None,
            weight: DEFAULT_WEIGHT,
        }
    }
}

impl NetworkTopologyConfig {
    pub fn from_arguments(arguments: &Arguments) -> Self {
        let topology_config_path = match arguments.get_str(TOPOLOGY_CONFIG_PATH) {
            Ok(Some(path)) => Some(PathBuf::from(path)),
            Ok(None) => {
                warn!(key = TOPOLOGY_CONFIG_PATH, "topology config path not set, scoring disabled");
                None
            }
            Err(e) => {
                warn!(error = %e, "ignoring topology config path, scoring disabled");
                None
            }
        };

        let weight = match arguments.get_int(PLUGIN_WEIGHT) {
            Ok(Some(weight)) => weight,
            Ok(None) => DEFAULT_WEIGHT,
            Err(e) => {
                warn!(error = %e, default = DEFAULT_WEIGHT, "ignoring plugin weight");
                DEFAULT_WEIGHT
            }
        };

        debug!(path = ?topology_config_path, weight, "network topology config parsed");
        Self {
            topology_config_path,
            weight,
        }
    }

    /// Score given to each node of a job's selection.
    pub fn node_score(&self) -> f64 {
        NETWORK_EXTRA_SCORE.saturating_mul(self.weight) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let config = NetworkTopologyConfig::from_arguments(&Arguments::new());
        assert_eq!(config, NetworkTopologyConfig::default());
        assert_eq!(config.weight, 1);
        assert_eq!(config.node_score(), 1.0);
    }

    #[test]
    fn reads_path_and_weight() {
        let args = Arguments::new()
            .with(TOPOLOGY_CONFIG_PATH, "/etc/topology.toml")
            .with(PLUGIN_WEIGHT, 10_i64);
        let config = NetworkTopologyConfig::from_arguments(&args);

        assert_eq!(
            config.topology_config_path,
            Some(PathBuf::from("/etc/topology.toml"))
        );
        assert_eq!(config.weight, 10);
        assert_eq!(config.node_score(), 10.0);
    }

    #[test]
    fn malformed_weight_keeps_default() {
        let args = Arguments::new().with(PLUGIN_WEIGHT, "heavy");
        assert_eq!(NetworkTopologyConfig::from_arguments(&args).weight, DEFAULT_WEIGHT);

        let args = Arguments::new().with(PLUGIN_WEIGHT, 3.5_f64);
        assert_eq!(NetworkTopologyConfig::from_arguments(&args).weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn non_string_path_disables_scoring() {
        let args = Arguments::new().with(TOPOLOGY_CONFIG_PATH, 7_i64);
        let config = NetworkTopologyConfig::from_arguments(&args);
        assert!(config.topology_config_path.is_none());
    }

    #[test]
    fn quoted_weight_keeps_default() {
        let args = Arguments::new().with(PLUGIN_WEIGHT, "5");
        let config = NetworkTopologyConfig::from_arguments(&args);
        assert_eq!(config.weight, DEFAULT_WEIGHT);
        assert_eq!(config.node_score(), 1.0);
    }
}

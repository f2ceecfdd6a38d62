//! Topology error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors raised while loading, validating, or evaluating a switch hierarchy.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read switch record {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse switch record: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid hostlist expression {expr:?}: {reason}")]
    Hostlist { expr: String, reason: String },

    #[error("switch record declares no switches")]
    Empty,

    #[error("duplicate switch name: {0}")]
    DuplicateSwitch(String),

    #[error("switch {0} declares neither nodes nor switches")]
    EmptySwitch(String),

    #[error("switch {parent} references unknown switch {child}")]
    UnknownSwitch { parent: String, child: String },

    #[error("switch {child} has more than one parent ({first}, {second})")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },

    #[error("switch hierarchy contains a cycle through {0}")]
    Cycle(String),

    #[error("node {node} is attached to more than one leaf switch ({first}, {second})")]
    NodeOnMultipleLeaves {
        node: String,
        first: String,
        second: String,
    },

    #[error("no switch record loaded; validate a record first")]
    NotLoaded,

    #[error("minimum member count must be greater than zero")]
    ZeroMinMember,

    #[error("required node {0} is not available in the topology")]
    RequiredNodeUnavailable(String),

    #[error("no switch spans {needed} available nodes")]
    InsufficientNodes { needed: usize },
}

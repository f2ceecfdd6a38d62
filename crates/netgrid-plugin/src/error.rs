//! Plugin error types.

use std::path::PathBuf;

use netgrid_framework::JobId;
use netgrid_topology::TopologyError;
use thiserror::Error;

/// Errors surfaced to the host from the network-topology scorer.
#[derive(Debug, Error)]
pub enum NetworkTopologyError {
    #[error("job not found in session: {0}")]
    JobNotFound(JobId),

    #[error("invalid switch record {}: {source}", .path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: TopologyError,
    },

    #[error("failed to evaluate nodes tree for job {job}: {source}")]
    Evaluation {
        job: JobId,
        #[source]
        source: TopologyError,
    },
}

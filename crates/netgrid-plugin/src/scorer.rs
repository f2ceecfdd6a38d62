//! Batch node-order scorer for the network-topology plugin.
//!
//! For each task, the scorer looks up its job's node selection, computing it
//! on first use, and gives every selected node the same weighted score.
//! Nodes outside the selection get no score. Once a job has a selection it
//! is reused for the rest of the session, even when later calls offer a
//! different candidate list.

use std::collections::HashMap;
use std::sync::Arc;

use netgrid_framework::{BatchNodeOrder, JobId, JobInfo, NodeInfo, NodeScores, TaskInfo};
use netgrid_topology::TopologyEvaluator;
use tracing::{debug, error, info, warn};

use crate::cache::{SelectionCache, SelectionResult};
use crate::config::NetworkTopologyConfig;
use crate::error::NetworkTopologyError;

/// Scores nodes for one session. Shares configuration, cache, and evaluator
/// with the plugin instance that created it.
pub struct TopologyScorer {
    config: Arc<NetworkTopologyConfig>,
    cache: Arc<SelectionCache>,
    evaluator: Arc<dyn TopologyEvaluator>,
    jobs: Arc<HashMap<JobId, JobInfo>>,
}

impl TopologyScorer {
    pub fn new(
        config: Arc<NetworkTopologyConfig>,
        cache: Arc<SelectionCache>,
        evaluator: Arc<dyn TopologyEvaluator>,
        jobs: Arc<HashMap<JobId, JobInfo>>,
    ) -> Self {
        Self {
            config,
            cache,
            evaluator,
            jobs,
        }
    }

    /// Score `nodes` for `task` with the typed error.
    pub fn score_task(
        &self,
        task: &TaskInfo,
        nodes: &[NodeInfo],
    ) -> Result<NodeScores, NetworkTopologyError> {
        let job = self
            .jobs
            .get(&task.job)
            .ok_or_else(|| NetworkTopologyError::JobNotFound(task.job.clone()))?;

        if let Some(cached) = self.cache.get(&job.uid) {
            debug!(job = %job.uid, task = %task.uid, "using cached node selection");
            return Ok(self.scores_for(&cached));
        }

        let selection = self
            .cache
            .get_or_try_compute(&job.uid, || self.select(task, job, nodes))?;

        Ok(selection
            .map(|selection| self.scores_for(&selection))
            .unwrap_or_default())
    }

    /// Compute a fresh selection for `job`.
    ///
    /// `Ok(None)` means scoring was skipped and nothing should be cached.
    fn select(
        &self,
        task: &TaskInfo,
        job: &JobInfo,
        nodes: &[NodeInfo],
    ) -> Result<Option<SelectionResult>, NetworkTopologyError> {
        let min_member = job.effective_min_member();

        let Some(path) = self.config.topology_config_path.as_deref() else {
            error!(job = %job.uid, "topology config path not configured, skipping network topology scoring");
            return Ok(None);
        };

        if let Err(e) = self.evaluator.validate_switch_record(path) {
            error!(path = %path.display(), error = %e, "failed to validate switch record");
            return Err(NetworkTopologyError::Validation {
                path: path.to_path_buf(),
                source: e,
            });
        }

        let available: Vec<String> = nodes.iter().map(|node| node.name.clone()).collect();
        debug!(
            task = %format!("{}/{}", task.namespace, task.name),
            available = ?available,
            min_member,
            "evaluating network topology"
        );

        if available.len() < min_member as usize {
            warn!(
                job = %job.uid,
                available = available.len(),
                min_member,
                "available nodes fewer than min member, skipping network topology scoring"
            );
            return Ok(None);
        }

        let required: Vec<String> = Vec::new();
        let selection = self
            .evaluator
            .eval_nodes_tree(&available, &required, min_member)
            .map_err(|e| {
                error!(job = %job.uid, error = %e, "failed to evaluate nodes tree");
                NetworkTopologyError::Evaluation {
                    job: job.uid.clone(),
                    source: e,
                }
            })?;

        info!(
            job = %job.uid,
            selected = ?selection.nodes,
            leaf_switch_count = selection.leaf_switch_count,
            "node selection cached"
        );
        Ok(Some(selection.into()))
    }

    fn scores_for(&self, selection: &SelectionResult) -> NodeScores {
        let score = self.config.node_score();
        selection
            .selected_nodes
            .iter()
            .map(|node| (node.clone(), score))
            .collect()
    }
}

impl BatchNodeOrder for TopologyScorer {
    fn score(&self, task: &TaskInfo, nodes: &[NodeInfo]) -> anyhow::Result<NodeScores> {
        Ok(self.score_task(task, nodes)?)
    }
}

//! Scheduling session and the plugin extension points it exposes.
//!
//! A session lives for one scheduling cycle. Plugins are opened against it,
//! register their callbacks, and are closed when the cycle ends; any state a
//! plugin accumulates for the cycle is dropped with the plugin instance.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::types::{JobId, JobInfo, NodeInfo, NodeScores, TaskInfo};

/// A scheduler plugin.
pub trait Plugin: Send + Sync {
    /// Stable plugin name, used for registration and deduplication.
    fn name(&self) -> &str;

    /// Called once when the session opens. Register callbacks here.
    fn on_session_open(&self, ssn: &mut Session);

    /// Called once when the session closes.
    fn on_session_close(&self, ssn: &mut Session);
}

/// Batch node-order extension point: score every candidate node for a task.
///
/// Implementations may be called concurrently, for tasks of the same job as
/// well as for different jobs.
pub trait BatchNodeOrder: Send + Sync {
    fn score(&self, task: &TaskInfo, nodes: &[NodeInfo]) -> anyhow::Result<NodeScores>;
}

impl<F> BatchNodeOrder for F
where
    F: Fn(&TaskInfo, &[NodeInfo]) -> anyhow::Result<NodeScores> + Send + Sync,
{
    fn score(&self, task: &TaskInfo, nodes: &[NodeInfo]) -> anyhow::Result<NodeScores> {
        self(task, nodes)
    }
}

/// One scheduling cycle's mutable context.
pub struct Session {
    uid: String,
    jobs: Arc<HashMap<JobId, JobInfo>>,
    nodes: Vec<NodeInfo>,
    /// Registered batch node-order callbacks, in registration order.
    batch_node_order_fns: Vec<(String, Arc<dyn BatchNodeOrder>)>,
}

impl Session {
    /// Create a new session over a snapshot of jobs and nodes.
    pub fn new(uid: impl Into<String>, jobs: HashMap<JobId, JobInfo>, nodes: Vec<NodeInfo>) -> Self {
        Self {
            uid: uid.into(),
            jobs: Arc::new(jobs),
            nodes,
            batch_node_order_fns: Vec::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Shared handle to the session's jobs, for callbacks that outlive a borrow.
    pub fn jobs(&self) -> &Arc<HashMap<JobId, JobInfo>> {
        &self.jobs
    }

    pub fn job(&self, uid: &str) -> Option<&JobInfo> {
        self.jobs.get(uid)
    }

    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    /// Register a batch node-order callback for `plugin`.
    ///
    /// A second registration under the same plugin name replaces the first.
    pub fn add_batch_node_order_fn(&mut self, plugin: &str, f: Arc<dyn BatchNodeOrder>) {
        if let Some(slot) = self
            .batch_node_order_fns
            .iter_mut()
            .find(|(name, _)| name == plugin)
        {
            debug!(plugin, "replacing batch node-order fn");
            slot.1 = f;
            return;
        }
        self.batch_node_order_fns.push((plugin.to_string(), f));
    }

    /// Names of plugins with a registered batch node-order callback.
    pub fn batch_node_order_plugins(&self) -> Vec<&str> {
        self.batch_node_order_fns
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Score `nodes` for `task` with every registered callback.
    ///
    /// Scores from different plugins are summed per node. The first failing
    /// callback aborts scoring and its error is returned with the plugin name
    /// attached.
    pub fn batch_node_order(
        &self,
        task: &TaskInfo,
        nodes: &[NodeInfo],
    ) -> anyhow::Result<NodeScores> {
        let mut totals = NodeScores::with_capacity(nodes.len());

        for (plugin, f) in &self.batch_node_order_fns {
            let scores = f
                .score(task, nodes)
                .with_context(|| format!("plugin {plugin} failed to score task {}", task.uid))?;
            for (node, score) in scores {
                *totals.entry(node).or_insert(0.0) += score;
            }
        }

        Ok(totals)
    }

    /// Open every plugin against this session, in order.
    pub fn open_plugins(&mut self, plugins: &[Box<dyn Plugin>]) {
        for plugin in plugins {
            plugin.on_session_open(self);
            info!(session = %self.uid, plugin = plugin.name(), "plugin opened");
        }
    }

    /// Close every plugin, in order.
    pub fn close_plugins(&mut self, plugins: &[Box<dyn Plugin>]) {
        for plugin in plugins {
            plugin.on_session_close(self);
            debug!(session = %self.uid, plugin = plugin.name(), "plugin closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_session() -> Session {
        let job = JobInfo::new("job-a", 1).with_tasks(1);
        let jobs = HashMap::from([(job.uid.clone(), job)]);
        let nodes = vec![NodeInfo::new("n1"), NodeInfo::new("n2")];
        Session::new("ssn-1", jobs, nodes)
    }

    fn fixed(scores: &[(&str, f64)]) -> Arc<dyn BatchNodeOrder> {
        let scores: NodeScores = scores.iter().map(|(n, s)| (n.to_string(), *s)).collect();
        Arc::new(
            move |_: &TaskInfo, _: &[NodeInfo]| -> anyhow::Result<NodeScores> { Ok(scores.clone()) },
        )
    }

    struct CountingPlugin {
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_session_open(&self, ssn: &mut Session) {
            self.opened.fetch_add(1, Ordering::SeqCst);
            ssn.add_batch_node_order_fn(self.name(), fixed(&[("n1", 1.0)]));
        }

        fn on_session_close(&self, _ssn: &mut Session) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn session_exposes_jobs_and_nodes() {
        let ssn = test_session();
        assert_eq!(ssn.uid(), "ssn-1");
        assert!(ssn.job("job-a").is_some());
        assert!(ssn.job("job-b").is_none());
        assert_eq!(ssn.nodes().len(), 2);
        assert_eq!(ssn.jobs().len(), 1);
    }

    #[test]
    fn no_callbacks_yields_empty_scores() {
        let ssn = test_session();
        let task = TaskInfo::new("job-a-0", "job-a");
        let scores = ssn.batch_node_order(&task, ssn.nodes()).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn scores_from_plugins_are_summed() {
        let mut ssn = test_session();
        ssn.add_batch_node_order_fn("a", fixed(&[("n1", 1.0), ("n2", 2.0)]));
        ssn.add_batch_node_order_fn("b", fixed(&[("n1", 10.0)]));

        let task = TaskInfo::new("job-a-0", "job-a");
        let scores = ssn.batch_node_order(&task, ssn.nodes()).unwrap();

        assert_eq!(scores.get("n1"), Some(&11.0));
        assert_eq!(scores.get("n2"), Some(&2.0));
    }

    #[test]
    fn first_error_aborts_and_names_plugin() {
        let mut ssn = test_session();
        ssn.add_batch_node_order_fn(
            "broken",
            Arc::new(|_: &TaskInfo, _: &[NodeInfo]| -> anyhow::Result<NodeScores> {
                Err(anyhow::anyhow!("boom"))
            }),
        );
        ssn.add_batch_node_order_fn("after", fixed(&[("n1", 1.0)]));

        let task = TaskInfo::new("job-a-0", "job-a");
        let err = ssn.batch_node_order(&task, ssn.nodes()).unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("broken"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn re_registration_replaces_callback() {
        let mut ssn = test_session();
        ssn.add_batch_node_order_fn("a", fixed(&[("n1", 1.0)]));
        ssn.add_batch_node_order_fn("a", fixed(&[("n1", 5.0)]));

        assert_eq!(ssn.batch_node_order_plugins(), vec!["a"]);
        let task = TaskInfo::new("job-a-0", "job-a");
        let scores = ssn.batch_node_order(&task, ssn.nodes()).unwrap();
        assert_eq!(scores.get("n1"), Some(&5.0));
    }

    #[test]
    fn plugin_lifecycle_is_driven_by_session() {
        let opened = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));
        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(CountingPlugin {
            opened: opened.clone(),
            closed: closed.clone(),
        })];

        let mut ssn = test_session();
        ssn.open_plugins(&plugins);
        assert_eq!(opened.load(Ordering::SeqCst), 1);
        assert_eq!(ssn.batch_node_order_plugins(), vec!["counting"]);

        ssn.close_plugins(&plugins);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}

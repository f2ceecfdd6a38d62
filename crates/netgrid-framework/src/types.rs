//! Domain types for jobs, tasks, and nodes seen by a scheduling session.
//!
//! These mirror what the host scheduler hands to plugins: a job groups the
//! tasks that must be placed together, a task points back at its job, and a
//! node is a placement candidate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a job within a session.
pub type JobId = String;

/// Unique identifier for a task within a job.
pub type TaskId = String;

/// Name of a compute node in the cluster.
pub type NodeName = String;

/// Node name → score, as produced by a node-order extension point.
pub type NodeScores = HashMap<NodeName, f64>;

// ── Task ───────────────────────────────────────────────────────────

/// A single schedulable unit belonging to a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskInfo {
    pub uid: TaskId,
    /// Owning job.
    pub job: JobId,
    pub name: String,
    pub namespace: String,
}

impl TaskInfo {
    pub fn new(uid: impl Into<TaskId>, job: impl Into<JobId>) -> Self {
        let uid = uid.into();
        Self {
            name: uid.clone(),
            uid,
            job: job.into(),
            namespace: "default".to_string(),
        }
    }
}

// ── Job ────────────────────────────────────────────────────────────

/// A gang of tasks that the scheduler places as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobInfo {
    pub uid: JobId,
    pub name: String,
    pub namespace: String,
    /// Declared minimum member count. Zero means "not declared".
    pub min_member: u32,
    pub tasks: HashMap<TaskId, TaskInfo>,
}

impl JobInfo {
    /// Create a job with no tasks.
    pub fn new(uid: impl Into<JobId>, min_member: u32) -> Self {
        let uid = uid.into();
        Self {
            name: uid.clone(),
            uid,
            namespace: "default".to_string(),
            min_member,
            tasks: HashMap::new(),
        }
    }

    /// Add a task to this job, rewriting its job reference to point here.
    pub fn add_task(&mut self, mut task: TaskInfo) {
        task.job = self.uid.clone();
        self.tasks.insert(task.uid.clone(), task);
    }

    /// Builder-style variant of [`JobInfo::add_task`] creating `count` tasks
    /// named `<job>-<i>`.
    pub fn with_tasks(mut self, count: usize) -> Self {
        for i in 0..count {
            let task = TaskInfo::new(format!("{}-{i}", self.uid), self.uid.clone());
            self.add_task(task);
        }
        self
    }

    /// The number of members that must be placed together.
    ///
    /// A job without an explicit minimum needs all of its tasks.
    pub fn effective_min_member(&self) -> u32 {
        if self.min_member == 0 {
            u32::try_from(self.tasks.len()).unwrap_or(u32::MAX)
        } else {
            self.min_member
        }
    }
}

// ── Node ───────────────────────────────────────────────────────────

/// A candidate compute node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeInfo {
    pub name: NodeName,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl NodeInfo {
    pub fn new(name: impl Into<NodeName>) -> Self {
        Self {
            name: name.into(),
            labels: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_min_member_wins() {
        let job = JobInfo::new("job-a", 2).with_tasks(5);
        assert_eq!(job.effective_min_member(), 2);
    }

    #[test]
    fn zero_min_member_falls_back_to_task_count() {
        let job = JobInfo::new("job-a", 0).with_tasks(3);
        assert_eq!(job.effective_min_member(), 3);
    }

    #[test]
    fn zero_min_member_without_tasks_is_zero() {
        let job = JobInfo::new("job-a", 0);
        assert_eq!(job.effective_min_member(), 0);
    }

    #[test]
    fn add_task_rewrites_job_reference() {
        let mut job = JobInfo::new("job-a", 1);
        job.add_task(TaskInfo::new("t0", "somewhere-else"));

        let task = job.tasks.get("t0").unwrap();
        assert_eq!(task.job, "job-a");
    }

    #[test]
    fn with_tasks_names_tasks_after_job() {
        let job = JobInfo::new("train", 0).with_tasks(2);
        assert!(job.tasks.contains_key("train-0"));
        assert!(job.tasks.contains_key("train-1"));
    }

    #[test]
    fn node_labels_default_to_empty() {
        let node: NodeInfo = node_from_toml("name = \"n1\"");
        assert_eq!(node.name, "n1");
        assert!(node.labels.is_empty());
    }

    fn node_from_toml(s: &str) -> NodeInfo {
        toml::from_str(s).unwrap()
    }
}

//! `netgrid score`: run one session through the network-topology plugin.
//!
//! ```toml
//! nodes = "n[1-9]"
//!
//! [arguments]
//! "topology-config-path" = "topology.toml"   # relative to this file
//! "network-topology.weight" = 5
//!
//! [[jobs]]
//! uid = "train"
//! min_member = 3
//! tasks = 3
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use netgrid_framework::{Arguments, JobInfo, NodeInfo, PluginRegistry, Session};
use netgrid_plugin::{PLUGIN_NAME, TOPOLOGY_CONFIG_PATH};
use netgrid_topology::hostlist;

#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default = "default_session_uid")]
    uid: String,
    /// Candidate nodes as a hostlist.
    nodes: String,
    #[serde(default)]
    arguments: Arguments,
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    uid: String,
    #[serde(default)]
    min_member: u32,
    /// Number of tasks in the job.
    tasks: usize,
}

fn default_session_uid() -> String {
    "cli".to_string()
}

/// Per-job scores, ordered for stable output.
type Report = BTreeMap<String, BTreeMap<String, f64>>;

pub fn score(path: &str, format: &str) -> anyhow::Result<()> {
    let report = run(Path::new(path))?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print!("{}", format_report(&report));
        }
    }

    Ok(())
}

fn run(path: &Path) -> anyhow::Result<Report> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file {}", path.display()))?;
    let mut file: SessionFile = toml::from_str(&content)?;
    resolve_topology_path(&mut file.arguments, path.parent().unwrap_or(Path::new(".")))?;

    let nodes: Vec<NodeInfo> = hostlist::expand(&file.nodes)?
        .into_iter()
        .map(NodeInfo::new)
        .collect();
    let jobs: HashMap<_, _> = file
        .jobs
        .iter()
        .map(|entry| {
            let job = JobInfo::new(entry.uid.clone(), entry.min_member).with_tasks(entry.tasks);
            (job.uid.clone(), job)
        })
        .collect();

    let mut registry = PluginRegistry::new();
    netgrid_plugin::register(&mut registry)?;
    let plugins = vec![registry.build(PLUGIN_NAME, file.arguments)?];

    let mut ssn = Session::new(file.uid, jobs, nodes);
    ssn.open_plugins(&plugins);

    let mut report = Report::new();
    let mut uids: Vec<_> = ssn.jobs().keys().cloned().collect();
    uids.sort();
    for uid in uids {
        let Some(job) = ssn.job(&uid) else { continue };
        let mut task_ids: Vec<_> = job.tasks.keys().collect();
        task_ids.sort();
        let Some(task) = task_ids.first().and_then(|id| job.tasks.get(*id)) else {
            info!(job = %uid, "job has no tasks, skipping");
            continue;
        };

        let scores = ssn.batch_node_order(task, ssn.nodes())?;
        report.insert(uid.clone(), scores.into_iter().collect());
    }

    ssn.close_plugins(&plugins);
    Ok(report)
}

/// Make a relative topology path relative to the session file.
fn resolve_topology_path(arguments: &mut Arguments, base: &Path) -> anyhow::Result<()> {
    let Some(path) = arguments.get_str(TOPOLOGY_CONFIG_PATH)? else {
        return Ok(());
    };
    let path = Path::new(path);
    if path.is_relative() {
        let resolved = base.join(path).to_string_lossy().into_owned();
        arguments.insert(TOPOLOGY_CONFIG_PATH, resolved);
    }
    Ok(())
}

fn format_report(report: &Report) -> String {
    let mut out = String::new();
    for (job, scores) in report {
        let line = if scores.is_empty() {
            "(no scores)".to_string()
        } else {
            scores
                .iter()
                .map(|(node, score)| format!("{node}={score}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        out.push_str(&format!("{job}: {line}\n"));
    }
    out
}

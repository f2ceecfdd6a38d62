//! The evaluator contract consumed by scheduler plugins.
//!
//! Plugins depend on [`TopologyEvaluator`] only. [`SwitchTreeEvaluator`] is
//! the in-tree implementation: validating a record loads it, and evaluation
//! runs against the most recently validated tree.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::{TopologyError, TopologyResult};
use crate::eval::Selection;
use crate::tree::SwitchTree;

/// Validates switch records and selects topology-compact node subsets.
pub trait TopologyEvaluator: Send + Sync {
    /// Check that the file at `path` describes a well-formed switch hierarchy.
    fn validate_switch_record(&self, path: &Path) -> TopologyResult<()>;

    /// Select at least `min_member` nodes from `available`, including all of
    /// `required`, minimizing the number of leaf switches spanned.
    fn eval_nodes_tree(
        &self,
        available: &[String],
        required: &[String],
        min_member: u32,
    ) -> TopologyResult<Selection>;
}

/// A loaded tree and where it came from.
struct Loaded {
    path: Option<PathBuf>,
    tree: Arc<SwitchTree>,
}

/// Evaluator backed by [`SwitchTree`].
#[derive(Default)]
pub struct SwitchTreeEvaluator {
    current: RwLock<Option<Loaded>>,
}

impl SwitchTreeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator with a tree already loaded, bypassing file validation.
    pub fn with_tree(tree: SwitchTree) -> Self {
        Self {
            current: RwLock::new(Some(Loaded {
                path: None,
                tree: Arc::new(tree),
            })),
        }
    }

    /// The most recently validated tree, if any.
    pub fn tree(&self) -> Option<Arc<SwitchTree>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|loaded| loaded.tree.clone())
    }

    /// Path of the most recently validated record.
    pub fn loaded_path(&self) -> Option<PathBuf> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|loaded| loaded.path.clone())
    }
}

impl TopologyEvaluator for SwitchTreeEvaluator {
    fn validate_switch_record(&self, path: &Path) -> TopologyResult<()> {
        let tree = SwitchTree::from_file(path)?;
        info!(
            path = %path.display(),
            switches = tree.switches().len(),
            nodes = tree.node_count(),
            "switch record validated"
        );

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Loaded {
            path: Some(path.to_path_buf()),
            tree: Arc::new(tree),
        });
        Ok(())
    }

    fn eval_nodes_tree(
        &self,
        available: &[String],
        required: &[String],
        min_member: u32,
    ) -> TopologyResult<Selection> {
        let tree = self.tree().ok_or(TopologyError::NotLoaded)?;
        debug!(
            available = available.len(),
            required = required.len(),
            min_member,
            "evaluating nodes tree"
        );
        tree.eval_nodes_tree(available, required, min_member)
    }
}

//! Switch hierarchy built from a validated switch record.
//!
//! Switches are stored in declaration order and addressed by index. A switch
//! that lists compute nodes directly is a leaf for those nodes; every node
//! belongs to exactly one leaf. Levels count up from the leaves: a switch
//! with only nodes is level 0, a parent is one above its highest child.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::record::SwitchRecordFile;

/// A switch in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub name: String,
    pub level: u16,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Nodes attached directly to this switch.
    pub nodes: Vec<String>,
    /// Every node reachable below this switch, in declaration order.
    pub descendant_nodes: Vec<String>,
    pub link_speed: Option<u32>,
}

impl Switch {
    /// Whether this switch connects compute nodes directly.
    pub fn is_leaf(&self) -> bool {
        !self.nodes.is_empty()
    }
}

/// The validated switch hierarchy. May be a forest.
#[derive(Debug, Clone)]
pub struct SwitchTree {
    switches: Vec<Switch>,
    index: HashMap<String, usize>,
    /// Node name → index of its leaf switch.
    node_leaf: HashMap<String, usize>,
}

impl SwitchTree {
    /// Load, parse, and validate a switch record file.
    pub fn from_file(path: &Path) -> TopologyResult<Self> {
        let record = SwitchRecordFile::from_file(path)?;
        Self::from_record(&record)
    }

    /// Build and validate a hierarchy from a parsed record.
    pub fn from_record(record: &SwitchRecordFile) -> TopologyResult<Self> {
        if record.switches.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut index = HashMap::with_capacity(record.switches.len());
        for (i, rec) in record.switches.iter().enumerate() {
            if index.insert(rec.name.clone(), i).is_some() {
                return Err(TopologyError::DuplicateSwitch(rec.name.clone()));
            }
        }

        let mut switches = Vec::with_capacity(record.switches.len());
        let mut child_names = Vec::with_capacity(record.switches.len());
        for rec in &record.switches {
            let nodes = dedup(rec.node_names()?);
            let children = dedup(rec.switch_names()?);
            if nodes.is_empty() && children.is_empty() {
                return Err(TopologyError::EmptySwitch(rec.name.clone()));
            }
            switches.push(Switch {
                name: rec.name.clone(),
                level: 0,
                parent: None,
                children: Vec::new(),
                nodes,
                descendant_nodes: Vec::new(),
                link_speed: rec.link_speed,
            });
            child_names.push(children);
        }

        // Wire parent/child links.
        for (parent, names) in child_names.iter().enumerate() {
            for name in names {
                let child = *index.get(name).ok_or_else(|| TopologyError::UnknownSwitch {
                    parent: switches[parent].name.clone(),
                    child: name.clone(),
                })?;
                if child == parent {
                    return Err(TopologyError::Cycle(name.clone()));
                }
                if let Some(existing) = switches[child].parent {
                    return Err(TopologyError::MultipleParents {
                        child: name.clone(),
                        first: switches[existing].name.clone(),
                        second: switches[parent].name.clone(),
                    });
                }
                switches[child].parent = Some(parent);
                switches[parent].children.push(child);
            }
        }

        // Every node belongs to exactly one leaf.
        let mut node_leaf: HashMap<String, usize> = HashMap::new();
        for (i, switch) in switches.iter().enumerate() {
            for node in &switch.nodes {
                if let Some(&first) = node_leaf.get(node) {
                    return Err(TopologyError::NodeOnMultipleLeaves {
                        node: node.clone(),
                        first: switches[first].name.clone(),
                        second: switch.name.clone(),
                    });
                }
                node_leaf.insert(node.clone(), i);
            }
        }

        let order = bottom_up_order(&switches)?;
        for &i in &order {
            let level = switches[i]
                .children
                .iter()
                .map(|&c| switches[c].level + 1)
                .max()
                .unwrap_or(0);
            let mut descendants = switches[i].nodes.clone();
            for &c in &switches[i].children {
                descendants.extend(switches[c].descendant_nodes.iter().cloned());
            }
            switches[i].level = level;
            switches[i].descendant_nodes = descendants;
        }

        let tree = Self {
            switches,
            index,
            node_leaf,
        };
        debug!(
            switches = tree.switches.len(),
            leaves = tree.leaf_count(),
            nodes = tree.node_count(),
            roots = tree.roots().count(),
            "switch tree built"
        );
        Ok(tree)
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub fn switch(&self, name: &str) -> Option<&Switch> {
        self.index.get(name).map(|&i| &self.switches[i])
    }

    pub(crate) fn switch_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The leaf switch a node is attached to.
    pub fn leaf_of(&self, node: &str) -> Option<&Switch> {
        self.node_leaf.get(node).map(|&i| &self.switches[i])
    }

    pub(crate) fn leaf_index_of(&self, node: &str) -> Option<usize> {
        self.node_leaf.get(node).copied()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.node_leaf.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.node_leaf.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.switches.iter().filter(|s| s.is_leaf()).count()
    }

    /// Switches without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Switch> {
        self.switches.iter().filter(|s| s.parent.is_none())
    }

    /// Whether `ancestor` is `switch` or lies on its path to the root.
    pub(crate) fn is_ancestor(&self, ancestor: usize, mut switch: usize) -> bool {
        loop {
            if switch == ancestor {
                return true;
            }
            match self.switches[switch].parent {
                Some(parent) => switch = parent,
                None => return false,
            }
        }
    }

    /// Leaf switches in the subtree rooted at `top`, in depth-first order.
    pub(crate) fn leaves_under(&self, top: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![top];
        while let Some(i) = stack.pop() {
            if self.switches[i].is_leaf() {
                leaves.push(i);
            }
            stack.extend(self.switches[i].children.iter().rev());
        }
        leaves
    }
}

/// Post-order over the hierarchy so children come before parents.
///
/// Fails on cycles. Parent links are already unique, so a cycle is a loop of
/// switches none of which is reachable from a root.
fn bottom_up_order(switches: &[Switch]) -> TopologyResult<Vec<usize>> {
    let mut order = Vec::with_capacity(switches.len());
    let mut visited = vec![false; switches.len()];

    for root in (0..switches.len()).filter(|&i| switches[i].parent.is_none()) {
        // (switch, children already pushed)
        let mut stack = vec![(root, false)];
        while let Some((i, expanded)) = stack.pop() {
            if expanded {
                order.push(i);
                continue;
            }
            visited[i] = true;
            stack.push((i, true));
            for &c in switches[i].children.iter().rev() {
                stack.push((c, false));
            }
        }
    }

    if let Some(stuck) = visited.iter().position(|v| !v) {
        return Err(TopologyError::Cycle(switches[stuck].name.clone()));
    }
    Ok(order)
}

/// Drop repeated names, keeping the first occurrence.
fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}

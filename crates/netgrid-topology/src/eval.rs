//! Leaf-switch minimizing node selection.
//!
//! Given the currently available nodes, pick `min_member` of them spanning as
//! few leaf switches as possible:
//!
//! 1. Find the lowest switch whose subtree holds enough available nodes (and
//!    every required node). Ties go to the tightest fit.
//! 2. Take the required nodes, then top up from leaves they already occupy.
//! 3. Add leaves under that switch one at a time: the smallest leaf that
//!    covers the rest of the need if there is one, otherwise the fullest.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::tree::SwitchTree;

/// Nodes chosen for a placement and the number of leaf switches they span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub nodes: Vec<String>,
    pub leaf_switch_count: u16,
}

impl SwitchTree {
    /// Select at least `min_member` nodes out of `available`, always
    /// including `required`, spanning the fewest leaf switches found.
    pub fn eval_nodes_tree(
        &self,
        available: &[String],
        required: &[String],
        min_member: u32,
    ) -> TopologyResult<Selection> {
        if min_member == 0 {
            return Err(TopologyError::ZeroMinMember);
        }

        let avail: HashSet<&str> = available
            .iter()
            .map(String::as_str)
            .filter(|n| self.contains_node(n))
            .collect();
        let ignored = available.len() - avail.len();
        if ignored > 0 {
            debug!(ignored, "available nodes outside the switch record or repeated");
        }

        let mut selected: Vec<String> = Vec::new();
        let mut taken: HashSet<&str> = HashSet::new();
        for node in required {
            if !avail.contains(node.as_str()) {
                return Err(TopologyError::RequiredNodeUnavailable(node.clone()));
            }
            if taken.insert(node.as_str()) {
                selected.push(node.clone());
            }
        }

        let target = (min_member as usize).max(selected.len());

        let required_leaves: Vec<usize> = selected
            .iter()
            .filter_map(|n| self.leaf_index_of(n))
            .collect();

        let top = self
            .switches()
            .iter()
            .enumerate()
            .filter(|(i, _)| required_leaves.iter().all(|&leaf| self.is_ancestor(*i, leaf)))
            .map(|(i, s)| {
                let count = s
                    .descendant_nodes
                    .iter()
                    .filter(|n| avail.contains(n.as_str()))
                    .count();
                (i, s.level, count)
            })
            .filter(|&(_, _, count)| count >= target)
            .min_by_key(|&(i, level, count)| (level, count, i))
            .map(|(i, _, _)| i)
            .ok_or(TopologyError::InsufficientNodes { needed: target })?;

        debug!(top = %self.switches()[top].name, target, "top switch chosen");

        // Remaining available nodes per leaf under the top switch.
        let mut leaves: Vec<(usize, Vec<&str>)> = self
            .leaves_under(top)
            .into_iter()
            .map(|leaf| {
                let free = self.switches()[leaf]
                    .nodes
                    .iter()
                    .map(String::as_str)
                    .filter(|n| avail.contains(n) && !taken.contains(n))
                    .collect();
                (leaf, free)
            })
            .collect();

        let mut used: HashSet<usize> = required_leaves.iter().copied().collect();
        let mut need = target - selected.len();

        // Top up from leaves that are already spanned.
        for (leaf, free) in leaves.iter_mut() {
            if need == 0 {
                break;
            }
            if used.contains(&*leaf) {
                need -= take(free, need, &mut selected);
            }
        }

        while need > 0 {
            let candidates = leaves
                .iter()
                .enumerate()
                .filter(|(_, (leaf, free))| !used.contains(leaf) && !free.is_empty());

            let best_fit = candidates
                .clone()
                .filter(|(_, (_, free))| free.len() >= need)
                .min_by_key(|(pos, (_, free))| (free.len(), *pos))
                .map(|(pos, _)| pos);
            let pos = match best_fit {
                Some(pos) => pos,
                None => candidates
                    .max_by_key(|(pos, (_, free))| (free.len(), std::cmp::Reverse(*pos)))
                    .map(|(pos, _)| pos)
                    .ok_or(TopologyError::InsufficientNodes { needed: target })?,
            };

            let (leaf, free) = &mut leaves[pos];
            used.insert(*leaf);
            need -= take(free, need, &mut selected);
        }

        let leaf_switch_count = u16::try_from(used.len()).unwrap_or(u16::MAX);
        debug!(
            selected = selected.len(),
            leaf_switch_count, "nodes selected"
        );

        Ok(Selection {
            nodes: selected,
            leaf_switch_count,
        })
    }
}

/// Move up to `need` nodes from the front of `free` into `selected`.
fn take(free: &mut Vec<&str>, need: usize, selected: &mut Vec<String>) -> usize {
    let n = need.min(free.len());
    selected.extend(free.drain(..n).map(str::to_string));
    n
}

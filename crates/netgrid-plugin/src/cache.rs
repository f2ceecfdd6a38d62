//! Per-session cache of node selections, keyed by job.
//!
//! A job's selection is computed at most once per session. Each job gets its
//! own slot lock: the lookup, the evaluation, and the write for one job run
//! under that lock, while the map lock is only held to find or create the
//! slot. Concurrent scoring of different jobs never waits on another job's
//! evaluation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use netgrid_framework::JobId;
use netgrid_topology::Selection;

/// The node subset chosen for a job and the leaf switches it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub selected_nodes: Vec<String>,
    pub leaf_switch_count: u16,
}

impl From<Selection> for SelectionResult {
    fn from(selection: Selection) -> Self {
        Self {
            selected_nodes: selection.nodes,
            leaf_switch_count: selection.leaf_switch_count,
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<SelectionResult>>>>;

#[derive(Debug, Default)]
pub struct SelectionCache {
    slots: Mutex<HashMap<JobId, Slot>>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached selection for `job`.
    ///
    /// Waits if the job's selection is being computed right now.
    pub fn get(&self, job: &str) -> Option<Arc<SelectionResult>> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job)
            .cloned()?;
        let cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        cached.clone()
    }

    /// Return the cached selection for `job`, or compute and cache it.
    ///
    /// `compute` runs with the job's slot locked, so it runs at most once
    /// per job unless it declines to produce a result. `Ok(None)` (skipped)
    /// and `Err` leave the job uncached, and the next call tries again.
    pub fn get_or_try_compute<E, F>(&self, job: &str, compute: F) -> Result<Option<Arc<SelectionResult>>, E>
    where
        F: FnOnce() -> Result<Option<SelectionResult>, E>,
    {
        let slot = self.slot(job);
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(result) = cached.as_ref() {
            return Ok(Some(result.clone()));
        }

        let computed = compute()?.map(Arc::new);
        if let Some(result) = &computed {
            *cached = Some(result.clone());
        }
        Ok(computed)
    }

    /// Number of jobs with a cached selection.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find or create the slot for `job`.
    fn slot(&self, job: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(job.to_string()).or_default().clone()
    }
}

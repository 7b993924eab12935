//! In-memory collection of analysed runs.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use fpacer_core::prelude::*;
use fpacer_core::RunResult;
use serde::{Deserialize, Serialize};

/// Stable identifier of a stored run. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Analysed runs in upload order, plus the set selected for comparison.
#[derive(Debug, Default)]
pub struct RunStore {
    /// All runs indexed by ID
    runs: HashMap<RunId, RunResult>,

    /// Upload order of run IDs
    order: Vec<RunId>,

    /// Runs picked for comparison
    selected: BTreeSet<RunId>,

    next_id: u64,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run and return its new ID
    pub fn insert(&mut self, run: RunResult) -> RunId {
        self.next_id += 1;
        let id = RunId(self.next_id);
        self.runs.insert(id, run);
        self.order.push(id);
        id
    }

    /// Remove a run; it is also dropped from the comparison selection
    pub fn remove(&mut self, id: RunId) -> Option<RunResult> {
        self.order.retain(|&other| other != id);
        self.selected.remove(&id);
        self.runs.remove(&id)
    }

    pub fn get(&self, id: RunId) -> Option<&RunResult> {
        self.runs.get(&id)
    }

    /// Like [`get`](Self::get) but with an error for unknown IDs
    pub fn try_get(&self, id: RunId) -> Result<&RunResult> {
        self.get(id).ok_or_else(|| Error::run_not_found(id.get()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// IDs in upload order
    pub fn ids(&self) -> &[RunId] {
        &self.order
    }

    /// Runs in upload order
    pub fn iter(&self) -> impl Iterator<Item = (RunId, &RunResult)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.runs.get(id).map(|run| (*id, run)))
    }

    /// Runs whose app, package, file name, or device maker/model contains
    /// `query` (case-insensitive). An empty query matches everything.
    pub fn filter<'a>(&'a self, query: &str) -> impl Iterator<Item = (RunId, &'a RunResult)> + 'a {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(move |(_, run)| needle.is_empty() || matches_query(run, &needle))
    }

    // ── Comparison selection ─────────────────────────────────────────────

    /// Flip selection of a run. Returns whether it is now selected.
    pub fn toggle_selected(&mut self, id: RunId) -> Result<bool> {
        if !self.runs.contains_key(&id) {
            return Err(Error::run_not_found(id.get()));
        }
        if self.selected.remove(&id) {
            Ok(false)
        } else {
            self.selected.insert(id);
            Ok(true)
        }
    }

    pub fn is_selected(&self, id: RunId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected runs in upload order
    pub fn selected(&self) -> Vec<(RunId, &RunResult)> {
        self.iter()
            .filter(|(id, _)| self.selected.contains(id))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

fn matches_query(run: &RunResult, needle: &str) -> bool {
    let device = &run.device_info;
    [
        Some(run.app_name.as_str()),
        Some(run.package_name.as_str()),
        Some(run.file_name.as_str()),
        device.manufacturer(),
        device.model(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisSettings;
    use crate::pipeline::analyze;

    const DUMP: &str = "\
Refresh Period: 16666666 ns (60.00 Hz)
Test ID,Presentation Time,Fence Time,Vsync Time,Delta Time,Instant FPS
t1,0,0,0,33.3,30.0
t2,33000000,0,33000000,33.3,30.0
com.netflix.mediaclient,,,{\"ro.product.manufacturer\":\"Google\",\"ro.product.model\":\"Pixel 7\"}
";

    fn run(file_name: &str, app_name: Option<&str>) -> RunResult {
        analyze(DUMP, Some(file_name), app_name, &AnalysisSettings::default()).unwrap()
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut store = RunStore::new();
        let a = store.insert(run("a.txt", None));
        let b = store.insert(run("b.txt", None));

        assert_eq!(store.len(), 2);
        assert_eq!(store.ids(), &[a, b]);
        let names: Vec<_> = store.iter().map(|(_, r)| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = RunStore::new();
        let a = store.insert(run("a.txt", None));
        store.remove(a);
        let b = store.insert(run("b.txt", None));

        assert_ne!(a, b);
        assert!(store.get(a).is_none());
        assert!(matches!(store.try_get(a), Err(Error::RunNotFound { .. })));
    }

    #[test]
    fn test_remove_drops_selection_without_reindexing() {
        let mut store = RunStore::new();
        let a = store.insert(run("a.txt", None));
        let b = store.insert(run("b.txt", None));
        let c = store.insert(run("c.txt", None));

        store.toggle_selected(a).unwrap();
        store.toggle_selected(c).unwrap();
        assert!(store.remove(a).is_some());

        assert!(!store.is_selected(a));
        assert!(store.is_selected(c));
        let selected: Vec<_> = store.selected().into_iter().map(|(id, _)| id).collect();
        assert_eq!(selected, vec![c]);
        assert_eq!(store.ids(), &[b, c]);
    }

    #[test]
    fn test_toggle_selected() {
        let mut store = RunStore::new();
        let a = store.insert(run("a.txt", None));

        assert!(store.toggle_selected(a).unwrap());
        assert!(!store.toggle_selected(a).unwrap());
        store.toggle_selected(a).unwrap();
        store.clear_selection();
        assert!(store.selected().is_empty());

        let removed = store.remove(a).map(|_| a).unwrap();
        assert!(store.toggle_selected(removed).is_err());
    }

    #[test]
    fn test_filter_matches_identity_and_device() {
        let mut store = RunStore::new();
        let netflix = store.insert(run("first.txt", None));
        let custom = store.insert(run("second.txt", Some("Demo Game")));

        let hits = |q: &str| -> Vec<RunId> { store.filter(q).map(|(id, _)| id).collect() };

        assert_eq!(hits("FIRST"), vec![netflix]);
        assert_eq!(hits("DEMO"), vec![custom]);
        assert_eq!(hits("second"), vec![custom]);
        assert_eq!(hits("pixel"), vec![netflix, custom]);
        assert_eq!(hits("netflix").len(), 2);
        assert_eq!(hits("").len(), 2);
        assert!(hits("iphone").is_empty());
    }
}

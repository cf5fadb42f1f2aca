//! Process-lifetime store for the analysis history and the current index.
//!
//! Both live behind one lock so that a commit appends the history entry and
//! swaps the index together: readers see either the previous analysis or the
//! new one, never a mix. Readers get `Arc` snapshots and do not hold the lock
//! while they work.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::Result;
use crate::index::CategorizedIndex;
use crate::stats::{AnalysisEntry, AnalysisHistory, PlatformRollup};

#[derive(Debug, Default)]
struct StoreState {
    history: AnalysisHistory,
    current_index: Option<Arc<CategorizedIndex>>,
}

#[derive(Debug, Default)]
pub struct AnalysisStore {
    state: RwLock<StoreState>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` and make `index` current in one write.
    ///
    /// Returns the analysis id of the entry.
    pub fn commit(&self, index: Arc<CategorizedIndex>, entry: AnalysisEntry) -> usize {
        let mut state = self.state.write();
        state.current_index = Some(index);
        state.history.append(entry)
    }

    /// Index of the latest analysis, if any has run
    pub fn current_index(&self) -> Option<Arc<CategorizedIndex>> {
        self.state.read().current_index.clone()
    }

    /// Most recent entries, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<AnalysisEntry>> {
        self.state.read().history.recent(limit)
    }

    pub fn rollup(&self, platform: &str) -> PlatformRollup {
        PlatformRollup::fold(platform, self.state.read().history.for_platform(platform))
    }

    /// Platforms that have at least one entry
    pub fn platforms(&self) -> BTreeSet<String> {
        self.state
            .read()
            .history
            .entries()
            .iter()
            .map(|entry| entry.platform.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Central Application State — market bias service
// =============================================================================
//
// Shared across request handlers via `Arc<AppState>`.
//
// Thread safety:
//   - The scorer is immutable and stateless; handlers call it without locks.
//   - parking_lot::RwLock guards the runtime config (updated through the
//     config endpoint) and the history store.
//   - An atomic counter tracks how many bias calls have been served.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::history::BiasHistory;
use crate::runtime_config::RuntimeConfig;
use crate::scoring::BiasScorer;

pub struct AppState {
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    /// Where config updates are persisted. `None` keeps updates in memory.
    pub config_path: Option<PathBuf>,
    pub scorer: BiasScorer,
    pub history: BiasHistory,
    /// Number of successful bias evaluations served.
    pub evaluations: AtomicU64,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the scorer and history store from `config`. The scoring
    /// configuration is fixed for the life of the state.
    pub fn new(config: RuntimeConfig) -> Self {
        let scorer = BiasScorer::new(config.scoring.clone());
        let history = BiasHistory::new(config.history_capacity);

        Self {
            runtime_config: Arc::new(RwLock::new(config)),
            config_path: None,
            scorer,
            history,
            evaluations: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Persist config updates to `path`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn increment_evaluations(&self) -> u64 {
        self.evaluations.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.load(Ordering::SeqCst)
    }
}

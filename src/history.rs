// =============================================================================
// Bias History — bounded in-memory record of computed results
// =============================================================================
//
// The service records every successful bias call keyed by symbol and
// timestamp. The scoring engine never writes here; only the API layer does.
// Oldest records are evicted first once capacity is reached.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::scoring::BiasResult;

/// One recorded bias result.
#[derive(Debug, Clone, Serialize)]
pub struct BiasRecord {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Symbol exactly as the caller supplied it.
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub result: BiasResult,
}

pub struct BiasHistory {
    capacity: AtomicUsize,
    records: RwLock<VecDeque<BiasRecord>>,
}

impl BiasHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: AtomicUsize::new(capacity),
            records: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Append a result and return the stored record.
    pub fn record(&self, symbol: impl Into<String>, result: BiasResult) -> BiasRecord {
        let record = BiasRecord {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            timestamp: Utc::now(),
            result,
        };

        let mut records = self.records.write();
        records.push_back(record.clone());
        Self::evict(&mut records, self.capacity());

        record
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::SeqCst)
    }

    /// Change the retention limit, evicting the oldest records if the store
    /// is now over capacity.
    pub fn set_capacity(&self, capacity: usize) {
        let mut records = self.records.write();
        self.capacity.store(capacity, Ordering::SeqCst);
        Self::evict(&mut records, capacity);
    }

    fn evict(records: &mut VecDeque<BiasRecord>, capacity: usize) {
        while records.len() > capacity {
            records.pop_front();
        }
    }

    /// Newest-first records, optionally restricted to one symbol.
    pub fn recent(&self, symbol: Option<&str>, limit: usize) -> Vec<BiasRecord> {
        self.records
            .read()
            .iter()
            .rev()
            .filter(|r| symbol.map_or(true, |s| r.symbol == s))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

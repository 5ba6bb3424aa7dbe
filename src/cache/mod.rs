//! TTL cache for analysed series.
//!
//! Entries are keyed by symbol, lookback window and indicator parameters, so a
//! repeated scan with different RSI bounds or market-cap limits reuses the
//! indicator work without refetching.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::models::indicators::{AnalyzedSeries, IndicatorParams};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisKey {
    pub symbol: String,
    pub lookback_days: u32,
    params: String,
}

impl AnalysisKey {
    pub fn new(symbol: &str, lookback_days: u32, params: &IndicatorParams) -> Self {
        Self {
            symbol: symbol.to_string(),
            lookback_days,
            params: params.fingerprint(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Arc<AnalyzedSeries>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct AnalysisCache {
    entries: RwLock<HashMap<AnalysisKey, CacheEntry>>,
    ttl: Duration,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &AnalysisKey) -> Option<Arc<AnalyzedSeries>> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| Arc::clone(&entry.data))
    }

    pub fn insert(&self, key: AnalysisKey, data: Arc<AnalyzedSeries>) {
        let entry = CacheEntry {
            data,
            expires_at: Instant::now() + self.ttl,
        };
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, entry);
        }
    }

    /// Drops every entry for `symbol`, whatever its lookback or parameters.
    pub fn invalidate(&self, symbol: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|key, _| key.symbol != symbol);
        }
    }

    pub fn clear_expired(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| !entry.is_expired());
        }
    }

    pub fn clear_all(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (total, expired) = self
            .entries
            .read()
            .map(|entries| {
                let expired = entries.values().filter(|e| e.is_expired()).count();
                (entries.len(), expired)
            })
            .unwrap_or((0, 0));

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

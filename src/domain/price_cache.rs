//! Content-addressed price table cache.
//!
//! Keyed by the sorted, deduplicated symbol set and the date range, so two
//! requests for the same symbols in a different order share one entry. Each
//! entry keeps the fetched table together with the symbols skipped while
//! fetching it. Entries expire after an optional maximum age; the cache holds
//! at most `max_entries` outcomes and evicts the oldest insert first.

use crate::domain::fetch::FetchOutcome;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_ENTRIES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbols: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl CacheKey {
    pub fn new<S: AsRef<str>>(symbols: &[S], start: NaiveDate, end: NaiveDate) -> Self {
        let mut symbols: Vec<String> = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            start,
            end,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

#[derive(Debug)]
struct CacheEntry {
    outcome: FetchOutcome,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct PriceCache {
    entries: HashMap<CacheKey, CacheEntry>,
    max_age: Option<Duration>,
    max_entries: usize,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(None, DEFAULT_MAX_ENTRIES)
    }
}

impl PriceCache {
    /// `max_age` of `None` keeps entries for the life of the cache.
    /// `max_entries` is clamped to at least one.
    pub fn new(max_age: Option<Duration>, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.max_age {
            Some(max_age) => entry.stored_at.elapsed() < max_age,
            None => true,
        }
    }

    /// The cached outcome for `symbols` over `[start, end]`, table columns in
    /// the order of `symbols`. Stale entries are dropped and reported as a miss.
    pub fn get<S: AsRef<str>>(
        &mut self,
        symbols: &[S],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<FetchOutcome> {
        let key = CacheKey::new(symbols, start, end);
        let fresh = self.entries.get(&key).map(|e| self.is_fresh(e))?;
        if !fresh {
            tracing::debug!(symbols = key.symbols.len(), %start, %end, "cache entry expired");
            self.entries.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|e| FetchOutcome {
            table: e.outcome.table.select(symbols),
            failures: e.outcome.failures.clone(),
        })
    }

    pub fn insert<S: AsRef<str>>(
        &mut self,
        symbols: &[S],
        start: NaiveDate,
        end: NaiveDate,
        outcome: FetchOutcome,
    ) {
        let key = CacheKey::new(symbols, start, end);
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                outcome,
                stored_at: Instant::now(),
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.stored_at)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            tracing::debug!(symbols = key.symbols.len(), "evicting cached table");
            self.entries.remove(&key);
        }
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Cross-window aggregation: symbols that recur across window rankings.

use crate::domain::ranking::WindowRanking;
use std::collections::HashMap;

/// Occurrence counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyMap {
    /// Flatten the lists in the order given and count each symbol.
    pub fn from_lists<L, S>(lists: impl IntoIterator<Item = L>) -> Self
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::default();
        for list in lists {
            for symbol in list {
                map.record(symbol.as_ref());
            }
        }
        map
    }

    fn record(&mut self, symbol: &str) {
        match self.index.get(symbol) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(symbol.to_string(), self.entries.len());
                self.entries.push((symbol.to_string(), 1));
            }
        }
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.index.get(symbol).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(s, n)| (s.as_str(), *n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatPerformer {
    pub symbol: String,
    pub frequency: usize,
}

/// Symbols counted more than once, most frequent first. Equal counts keep
/// first-seen order.
pub fn repeat_performers(frequencies: &FrequencyMap) -> Vec<RepeatPerformer> {
    let mut repeats: Vec<RepeatPerformer> = frequencies
        .iter()
        .filter(|(_, n)| *n > 1)
        .map(|(symbol, frequency)| RepeatPerformer {
            symbol: symbol.to_string(),
            frequency,
        })
        .collect();
    repeats.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    repeats
}

/// Repeat members of the per-window best lists.
pub fn momentum(rankings: &[WindowRanking]) -> Vec<RepeatPerformer> {
    let lists = rankings
        .iter()
        .map(|r| r.best.iter().map(|e| e.symbol.as_str()));
    repeat_performers(&FrequencyMap::from_lists(lists))
}

/// Repeat members of the per-window worst lists.
pub fn weak(rankings: &[WindowRanking]) -> Vec<RepeatPerformer> {
    let lists = rankings
        .iter()
        .map(|r| r.worst.iter().map(|e| e.symbol.as_str()));
    repeat_performers(&FrequencyMap::from_lists(lists))
}

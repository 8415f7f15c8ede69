//! Trailing-window ranking of symbols by final cumulative return.

use crate::domain::price_table::{window_start, PriceTable};
use crate::domain::returns::{cumulative_returns, ReturnTable};
use chrono::NaiveDate;

pub const DEFAULT_WINDOWS: [u32; 4] = [360, 180, 90, 45];
pub const DEFAULT_TOP_K: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub symbol: String,
    pub final_return: f64,
}

/// One window's slice, its returns, and the extremes at either end.
///
/// `best` is highest return first, `worst` lowest return first.
#[derive(Debug, Clone)]
pub struct WindowRanking {
    pub days: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub returns: ReturnTable,
    pub best: Vec<RankedEntry>,
    pub worst: Vec<RankedEntry>,
}

impl WindowRanking {
    pub fn best_symbols(&self) -> Vec<String> {
        self.best.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn worst_symbols(&self) -> Vec<String> {
        self.worst.iter().map(|e| e.symbol.clone()).collect()
    }

    /// Number of symbols that had a final return in this window.
    pub fn ranked_count(&self) -> usize {
        self.returns
            .final_returns()
            .iter()
            .filter(|(_, r)| r.is_some())
            .count()
    }
}

pub fn rank_window(
    prices: &PriceTable,
    days: u32,
    top_k: usize,
    as_of: NaiveDate,
) -> WindowRanking {
    let slice = prices.trailing(days, as_of);
    let returns = cumulative_returns(&slice);

    let mut ascending: Vec<RankedEntry> = returns
        .final_returns()
        .into_iter()
        .filter_map(|(symbol, r)| {
            r.map(|final_return| RankedEntry {
                symbol: symbol.to_string(),
                final_return,
            })
        })
        .collect();
    // Stable, so equal returns keep column order.
    ascending.sort_by(|a, b| a.final_return.total_cmp(&b.final_return));

    // Best is the top K tail of the ascending order, shown highest first.
    let mut best = ascending[ascending.len().saturating_sub(top_k)..].to_vec();
    best.sort_by(|a, b| b.final_return.total_cmp(&a.final_return));

    let mut worst = ascending;
    worst.truncate(top_k);

    WindowRanking {
        days,
        start: window_start(as_of, days),
        end: as_of,
        returns,
        best,
        worst,
    }
}

/// Rank every window in the order given.
pub fn rank_windows(
    prices: &PriceTable,
    windows: &[u32],
    top_k: usize,
    as_of: NaiveDate,
) -> Vec<WindowRanking> {
    windows
        .iter()
        .map(|&days| rank_window(prices, days, top_k, as_of))
        .collect()
}

//! Dashboard assembly: every window ranking plus the cross-window sets.

use crate::domain::aggregate::{self, RepeatPerformer};
use crate::domain::allocation::Allocation;
use crate::domain::fetch::FetchFailure;
use crate::domain::price_table::PriceTable;
use crate::domain::ranking::{rank_windows, WindowRanking, DEFAULT_TOP_K, DEFAULT_WINDOWS};
use crate::domain::returns::{cumulative_returns, ReturnTable};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub windows: Vec<u32>,
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RankingConfig {
    pub fn longest_window(&self) -> u32 {
        self.windows.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub windows: Vec<WindowRanking>,
    pub momentum: Vec<RepeatPerformer>,
    pub weak: Vec<RepeatPerformer>,
}

impl Dashboard {
    pub fn momentum_symbols(&self) -> Vec<String> {
        self.momentum.iter().map(|r| r.symbol.clone()).collect()
    }

    pub fn weak_symbols(&self) -> Vec<String> {
        self.weak.iter().map(|r| r.symbol.clone()).collect()
    }
}

pub fn build_dashboard(prices: &PriceTable, config: &RankingConfig, as_of: NaiveDate) -> Dashboard {
    let windows = rank_windows(prices, &config.windows, config.top_k, as_of);
    let momentum = aggregate::momentum(&windows);
    let weak = aggregate::weak(&windows);
    tracing::info!(
        %as_of,
        windows = windows.len(),
        momentum = momentum.len(),
        weak = weak.len(),
        "dashboard built"
    );
    Dashboard {
        as_of,
        windows,
        momentum,
        weak,
    }
}

/// Start date offered for a comparison when none is chosen.
pub fn default_compare_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Cumulative returns of `symbols` over the whole of `prices`, gaps shown as 0.
pub fn compare<S: AsRef<str>>(prices: &PriceTable, symbols: &[S]) -> ReturnTable {
    cumulative_returns(&prices.select(symbols)).zero_filled()
}

/// Everything a display surface renders in one pass.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub dashboard: &'a Dashboard,
    pub allocation: Option<(f64, &'a [Allocation])>,
    pub comparison: Option<&'a ReturnTable>,
    pub failures: &'a [FetchFailure],
}

impl<'a> Report<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self {
            dashboard,
            allocation: None,
            comparison: None,
            failures: &[],
        }
    }

    pub fn with_allocation(mut self, total_funds: f64, allocations: &'a [Allocation]) -> Self {
        self.allocation = Some((total_funds, allocations));
        self
    }

    pub fn with_comparison(mut self, comparison: &'a ReturnTable) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_failures(mut self, failures: &'a [FetchFailure]) -> Self {
        self.failures = failures;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::domain::price::PricePoint;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    /// A and B rally only inside the last 45 days; C and D fall there.
    fn prices() -> PriceTable {
        let d = |n: i64| as_of() - Duration::days(n);
        let series = |old: f64, mid: f64, now: f64| {
            vec![
                PricePoint::new(d(300), old),
                PricePoint::new(d(60), mid),
                PricePoint::new(d(30), mid),
                PricePoint::new(as_of(), now),
            ]
        };
        PriceTable::from_series(vec![
            ("A", series(100.0, 100.0, 150.0)),
            ("B", series(100.0, 100.0, 140.0)),
            ("C", series(100.0, 100.0, 60.0)),
            ("D", series(100.0, 100.0, 70.0)),
        ])
    }

    #[test]
    fn default_config_matches_windows() {
        let config = RankingConfig::default();
        assert_eq!(config.windows, vec![360, 180, 90, 45]);
        assert_eq!(config.top_k, 9);
        assert_eq!(config.longest_window(), 360);
    }

    #[test]
    fn repeat_top_two_across_short_windows() {
        let config = RankingConfig {
            windows: vec![90, 45],
            top_k: 2,
        };
        let dashboard = build_dashboard(&prices(), &config, as_of());

        assert_eq!(dashboard.windows.len(), 2);
        assert_eq!(dashboard.momentum_symbols(), vec!["A", "B"]);
        assert!(dashboard.momentum.iter().all(|r| r.frequency == 2));
        assert_eq!(dashboard.weak_symbols(), vec!["C", "D"]);
    }

    #[test]
    fn single_window_has_no_repeats() {
        let config = RankingConfig {
            windows: vec![45],
            top_k: 2,
        };
        let dashboard = build_dashboard(&prices(), &config, as_of());
        assert!(dashboard.momentum.is_empty());
        assert!(dashboard.weak.is_empty());
    }

    #[test]
    fn compare_zero_fills_selection() {
        let d = |n: i64| as_of() - Duration::days(n);
        let prices = PriceTable::from_series(vec![
            ("A", vec![PricePoint::new(d(2), 10.0), PricePoint::new(d(1), 12.0)]),
            ("LATE", vec![PricePoint::new(d(1), 5.0)]),
        ]);
        let table = compare(&prices, &["LATE", "A", "MISSING"]);

        assert_eq!(table.symbols(), &["LATE", "A"]);
        assert_eq!(table.column("LATE").unwrap(), &[Some(0.0), Some(0.0)]);
        assert!((table.column("A").unwrap()[1].unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn report_builder_attaches_parts() {
        let dashboard = build_dashboard(&prices(), &RankingConfig::default(), as_of());
        let allocations: Vec<Allocation> = Vec::new();
        let report = Report::new(&dashboard).with_allocation(500.0, &allocations);
        assert_eq!(report.allocation.map(|(f, _)| f), Some(500.0));
        assert!(report.comparison.is_none());
        assert!(report.failures.is_empty());
    }
}

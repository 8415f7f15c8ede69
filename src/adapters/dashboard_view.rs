//! Display-ready view of a [`Report`], shared by the static HTML report and
//! the web pages.
//!
//! Numbers are formatted here so templates only place strings.

use crate::adapters::chart_svg::generate_returns_svg;
use crate::domain::aggregate::RepeatPerformer;
use crate::domain::allocation::Allocation;
use crate::domain::dashboard::Report;
use crate::domain::ranking::{RankedEntry, WindowRanking};
use crate::domain::returns::ReturnTable;

pub struct RankedRow {
    pub rank: usize,
    pub symbol: String,
    pub ret: String,
}

pub struct WindowView {
    pub days: u32,
    pub start: String,
    pub end: String,
    pub ranked: usize,
    pub best: Vec<RankedRow>,
    pub worst: Vec<RankedRow>,
    pub best_svg: String,
    pub worst_svg: String,
}

pub struct RepeatRow {
    pub symbol: String,
    pub frequency: usize,
}

pub struct AllocationRow {
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub quantity: String,
    pub available: bool,
}

pub struct AllocationView {
    pub total: String,
    pub rows: Vec<AllocationRow>,
}

pub struct ComparisonView {
    pub start: String,
    pub end: String,
    pub svg: String,
    pub finals: Vec<RankedRow>,
}

pub struct FailureRow {
    pub symbol: String,
    pub reason: String,
}

pub struct DashboardView {
    pub as_of: String,
    pub windows: Vec<WindowView>,
    pub momentum: Vec<RepeatRow>,
    pub weak: Vec<RepeatRow>,
    pub allocation: Option<AllocationView>,
    pub comparison: Option<ComparisonView>,
    pub failures: Vec<FailureRow>,
}

pub fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn fmt_money(value: f64) -> String {
    format!("{value:.2}")
}

fn ranked_rows(entries: &[RankedEntry]) -> Vec<RankedRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| RankedRow {
            rank: i + 1,
            symbol: e.symbol.clone(),
            ret: fmt_pct(e.final_return),
        })
        .collect()
}

fn window_view(ranking: &WindowRanking) -> WindowView {
    let best_svg = generate_returns_svg(
        &ranking.returns.select(&ranking.best_symbols()),
        &format!("Best performers, {} days", ranking.days),
    );
    let worst_svg = generate_returns_svg(
        &ranking.returns.select(&ranking.worst_symbols()),
        &format!("Worst performers, {} days", ranking.days),
    );
    WindowView {
        days: ranking.days,
        start: ranking.start.to_string(),
        end: ranking.end.to_string(),
        ranked: ranking.ranked_count(),
        best: ranked_rows(&ranking.best),
        worst: ranked_rows(&ranking.worst),
        best_svg,
        worst_svg,
    }
}

pub fn allocation_view(total_funds: f64, allocations: &[Allocation]) -> AllocationView {
    AllocationView {
        total: fmt_money(total_funds),
        rows: allocations
            .iter()
            .map(|a| AllocationRow {
                symbol: a.symbol.clone(),
                amount: fmt_money(a.amount),
                price: a.latest_price.map(fmt_money).unwrap_or_else(|| "-".into()),
                quantity: a
                    .quantity
                    .map(|q| format!("{q:.4}"))
                    .unwrap_or_else(|| "unavailable".into()),
                available: a.is_available(),
            })
            .collect(),
    }
}

pub fn comparison_view(comparison: &ReturnTable) -> ComparisonView {
    let date = |d: Option<&chrono::NaiveDate>| d.map(ToString::to_string).unwrap_or_default();
    ComparisonView {
        start: date(comparison.dates().first()),
        end: date(comparison.dates().last()),
        svg: generate_returns_svg(comparison, "Comparison"),
        finals: comparison
            .final_returns()
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, r))| RankedRow {
                rank: i + 1,
                symbol: symbol.to_string(),
                ret: r.map(fmt_pct).unwrap_or_else(|| "-".into()),
            })
            .collect(),
    }
}

impl DashboardView {
    pub fn from_report(report: &Report<'_>) -> Self {
        let dashboard = report.dashboard;
        let repeats = |list: &[RepeatPerformer]| -> Vec<RepeatRow> {
            list.iter()
                .map(|r| RepeatRow {
                    symbol: r.symbol.clone(),
                    frequency: r.frequency,
                })
                .collect()
        };
        Self {
            as_of: dashboard.as_of.to_string(),
            windows: dashboard.windows.iter().map(window_view).collect(),
            momentum: repeats(&dashboard.momentum),
            weak: repeats(&dashboard.weak),
            allocation: report
                .allocation
                .map(|(total, allocations)| allocation_view(total, allocations)),
            comparison: report.comparison.map(comparison_view),
            failures: report
                .failures
                .iter()
                .map(|f| FailureRow {
                    symbol: f.symbol.clone(),
                    reason: f.reason.clone(),
                })
                .collect(),
        }
    }
}

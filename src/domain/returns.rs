//! Cumulative return calculation.
//!
//! For each column independently:
//!   p'[t] = p[t] if present, else p'[t-1]        (forward fill, never backward)
//!   r[t]  = p'[t] / p'[t-1] - 1
//!   c[t]  = prod(1 + r[i]) - 1
//!
//! c is 0 at a symbol's first valid price and `None` before it. A column with
//! no valid price is all `None`, so it drops out of ranking instead of posing
//! as a flat 0% performer. A compounding step that is not finite (prior price
//! of zero) yields `None` from that row on.

use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl ReturnTable {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.symbols
            .iter()
            .zip(&self.columns)
            .map(|(s, c)| (s.as_str(), c.as_slice()))
    }

    /// Last row: each symbol's cumulative return over the whole table.
    pub fn final_returns(&self) -> Vec<(&str, Option<f64>)> {
        self.columns()
            .map(|(s, c)| (s, c.last().copied().flatten()))
            .collect()
    }

    /// Subset and reorder columns. Unknown symbols are skipped.
    pub fn select<S: AsRef<str>>(&self, symbols: &[S]) -> Self {
        let mut picked = Self {
            dates: self.dates.clone(),
            ..Self::default()
        };
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if picked.symbols.iter().any(|s| s == symbol) {
                continue;
            }
            if let Some(column) = self.column(symbol) {
                picked.symbols.push(symbol.to_string());
                picked.columns.push(column.to_vec());
            }
        }
        picked
    }

    /// Missing cells replaced with 0, for charting.
    pub fn zero_filled(&self) -> Self {
        Self {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| c.iter().map(|v| Some(v.unwrap_or(0.0))).collect())
                .collect(),
        }
    }
}

/// Forward-filled daily percent change; `None` on a symbol's first valid row
/// and everywhere before it.
pub fn daily_returns(prices: &PriceTable) -> Vec<(String, Vec<Option<f64>>)> {
    prices
        .columns()
        .map(|(symbol, column)| {
            let mut last: Option<f64> = None;
            let changes = column
                .iter()
                .map(|cell| {
                    let prev = last;
                    if cell.is_some() {
                        last = *cell;
                    }
                    match (prev, last) {
                        (Some(p0), Some(p1)) => Some(p1 / p0 - 1.0),
                        _ => None,
                    }
                })
                .collect();
            (symbol.to_string(), changes)
        })
        .collect()
}

pub fn cumulative_returns(prices: &PriceTable) -> ReturnTable {
    let (symbols, columns): (Vec<String>, Vec<Vec<Option<f64>>>) = daily_returns(prices)
        .into_iter()
        .zip(prices.columns())
        .map(|((symbol, changes), (_, raw))| {
            let mut growth: Option<f64> = None;
            let column = changes
                .iter()
                .zip(raw)
                .map(|(change, price)| {
                    growth = match (growth, *change) {
                        (Some(g), Some(r)) => Some(g * (1.0 + r)),
                        (Some(g), None) => Some(g),
                        (None, _) if price.is_some() => Some(1.0),
                        (None, _) => None,
                    };
                    growth.map(|g| g - 1.0).filter(|c| c.is_finite())
                })
                .collect();
            (symbol, column)
        })
        .unzip();

    ReturnTable {
        dates: prices.dates().to_vec(),
        symbols,
        columns,
    }
}

//! Date-aligned table of adjusted closes, one column per symbol.
//!
//! Columns share a single ascending, duplicate-free date index built from the
//! union of every series' dates. A symbol with no observation on a date holds
//! `None` there; nothing is filled at construction time.

use crate::domain::price::PricePoint;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeSet, HashMap};

/// `as_of` minus `days` calendar days, saturating at the earliest date.
pub fn window_start(as_of: NaiveDate, days: u32) -> NaiveDate {
    as_of
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Align per-symbol series on the union of their dates.
    ///
    /// Column order follows the input order. A symbol given twice is merged
    /// into its first column, later observations overwriting earlier ones.
    pub fn from_series<I, S>(series: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<PricePoint>)>,
        S: Into<String>,
    {
        let mut symbols: Vec<String> = Vec::new();
        let mut points: Vec<Vec<PricePoint>> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();

        for (symbol, series) in series {
            let symbol = symbol.into();
            match slot.get(&symbol) {
                Some(&i) => points[i].extend(series),
                None => {
                    slot.insert(symbol.clone(), symbols.len());
                    symbols.push(symbol);
                    points.push(series);
                }
            }
        }

        let dates: Vec<NaiveDate> = points
            .iter()
            .flat_map(|s| s.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let date_index: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let columns = points
            .iter()
            .map(|series| {
                let mut column = vec![None; dates.len()];
                for point in series {
                    column[date_index[&point.date]] = point.valid_close();
                }
                column
            })
            .collect();

        Self {
            dates,
            symbols,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of trading dates.
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

    /// True when at least one cell holds a price.
    pub fn has_data(&self) -> bool {
        self.columns.iter().flatten().any(Option::is_some)
    }

    /// Rows dated within `[start, end]`, both ends inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let rows: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= start && **d <= end)
            .map(|(i, _)| i)
            .collect();

        Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            symbols: self.symbols.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }

    /// The trailing window of `days` calendar days ending at `as_of`.
    ///
    /// Weekends and holidays mean the slice usually holds fewer than `days`
    /// rows.
    pub fn trailing(&self, days: u32, as_of: NaiveDate) -> Self {
        self.between(window_start(as_of, days), as_of)
    }

    /// Subset and reorder columns. Unknown symbols are skipped.
    pub fn select<S: AsRef<str>>(&self, symbols: &[S]) -> Self {
        let mut picked_symbols = Vec::with_capacity(symbols.len());
        let mut picked_columns = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if picked_symbols.iter().any(|s: &String| s == symbol) {
                continue;
            }
            if let Some(column) = self.column(symbol) {
                picked_symbols.push(symbol.to_string());
                picked_columns.push(column.to_vec());
            }
        }
        Self {
            dates: self.dates.clone(),
            symbols: picked_symbols,
            columns: picked_columns,
        }
    }

    /// Most recent non-null price for `symbol`.
    pub fn latest_price(&self, symbol: &str) -> Option<f64> {
        self.column(symbol)?.iter().rev().find_map(|c| *c)
    }
}

//! Price table acquisition across a universe.
//!
//! Symbols are fetched one at a time in universe order. Under
//! [`FetchPolicy::Abort`] the first failure ends the fetch and no partial
//! table is returned. Under [`FetchPolicy::Skip`] failing symbols are left out
//! of the table and reported in [`FetchOutcome::failures`].

use crate::domain::error::MomentumError;
use crate::domain::price::PricePoint;
use crate::domain::price_table::PriceTable;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FetchPolicy {
    #[default]
    Abort,
    Skip,
}

impl FromStr for FetchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown fetch policy '{other}' (expected abort or skip)")),
        }
    }
}

impl fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub table: PriceTable,
    pub failures: Vec<FetchFailure>,
}

/// Per-symbol series in request order, plus the symbols skipped under
/// [`FetchPolicy::Skip`].
pub type FetchedSeries = (Vec<(String, Vec<PricePoint>)>, Vec<FetchFailure>);

pub fn fetch_series(
    port: &dyn PricePort,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    policy: FetchPolicy,
) -> Result<FetchedSeries, MomentumError> {
    if start > end {
        return Err(MomentumError::NoData {
            reason: format!("start {start} is after end {end}"),
        });
    }

    let mut series: Vec<(String, Vec<PricePoint>)> = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    for symbol in symbols {
        match port.fetch_closes(symbol, start, end) {
            Ok(points) => {
                tracing::debug!(symbol = %symbol, points = points.len(), "fetched");
                series.push((symbol.clone(), points));
            }
            Err(e) => match policy {
                FetchPolicy::Abort => {
                    tracing::error!(symbol = %symbol, error = %e, "fetch failed, aborting");
                    return Err(MomentumError::Fetch {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
                FetchPolicy::Skip => {
                    tracing::warn!(symbol = %symbol, error = %e, "skipping symbol");
                    failures.push(FetchFailure {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    if !failures.is_empty() {
        tracing::info!(
            fetched = symbols.len() - failures.len(),
            total = symbols.len(),
            "fetch completed with skipped symbols"
        );
    }

    Ok((series, failures))
}

pub fn fetch_price_table(
    port: &dyn PricePort,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    policy: FetchPolicy,
) -> Result<FetchOutcome, MomentumError> {
    let (series, failures) = fetch_series(port, symbols, start, end, policy)?;

    let table = PriceTable::from_series(series);
    if !table.has_data() {
        return Err(MomentumError::NoData {
            reason: format!(
                "no prices for {} symbols between {start} and {end}",
                symbols.len()
            ),
        });
    }

    Ok(FetchOutcome { table, failures })
}

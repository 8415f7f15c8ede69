//! Price data access port.

use crate::domain::error::MomentumError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

/// Source of adjusted closing prices.
///
/// Implementations return one symbol's series for `[start, end]` in ascending
/// date order. A failure concerns that symbol only; what happens to the rest
/// of a fetch is the caller's policy.
pub trait PricePort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MomentumError>;
}

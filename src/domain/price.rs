//! Adjusted closing price observation.

use chrono::NaiveDate;

/// One trading day of a symbol's adjusted close. `close` is `None` when the
/// provider reported a null for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, close: None }
    }

    /// The close, if present and usable as a price.
    pub fn valid_close(&self) -> Option<f64> {
        self.close.filter(|c| c.is_finite())
    }
}

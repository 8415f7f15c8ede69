//! Yahoo Finance price adapter.
//!
//! Wraps the async `yahoo_finance_api` connector behind the synchronous
//! [`PricePort`] using a private current-thread runtime. Consecutive requests
//! are spaced by at least the configured rate-limit delay.

use crate::domain::error::MomentumError;
use crate::domain::price::PricePoint;
use crate::ports::price_port::PricePort;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use yahoo_finance_api as yahoo;

pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(200);

pub struct YahooAdapter {
    provider: yahoo::YahooConnector,
    runtime: Runtime,
    rate_limit_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for YahooAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooAdapter")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl From<yahoo::YahooError> for MomentumError {
    fn from(err: yahoo::YahooError) -> Self {
        MomentumError::DataSource {
            reason: format!("Yahoo Finance API error: {err}"),
        }
    }
}

impl YahooAdapter {
    pub fn new() -> Result<Self, MomentumError> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self, MomentumError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            runtime,
            rate_limit_delay,
            last_request: Mutex::new(None),
        })
    }

    /// Time still to wait before the next request may go out.
    fn pending_delay(&self) -> Duration {
        let last = self.last_request.lock().map(|g| *g).unwrap_or(None);
        match last {
            Some(at) => self.rate_limit_delay.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    fn mark_request(&self) {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(Instant::now());
        }
    }
}

fn to_offset_datetime(date: NaiveDate) -> Result<time::OffsetDateTime, MomentumError> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp).map_err(|e| MomentumError::DataSource {
        reason: format!("time conversion failed for {date}: {e}"),
    })
}

fn quote_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

impl PricePort for YahooAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MomentumError> {
        if symbol.trim().is_empty() {
            return Err(MomentumError::DataSource {
                reason: "empty symbol".to_string(),
            });
        }
        if start > end {
            return Err(MomentumError::DataSource {
                reason: format!("invalid date range {start} to {end}"),
            });
        }

        let start_time = to_offset_datetime(start)?;
        // The upper bound is exclusive on the provider side.
        let end_time = to_offset_datetime(end + ChronoDuration::days(1))?;
        let delay = self.pending_delay();

        let quotes = self.runtime.block_on(async {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let response = self
                .provider
                .get_quote_history(symbol, start_time, end_time)
                .await;
            self.mark_request();
            response?.quotes()
        })?;

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = quote_date(i64::try_from(q.timestamp).ok()?)?;
                (date >= start && date <= end).then(|| PricePoint {
                    date,
                    close: Some(q.adjclose),
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);

        tracing::debug!(symbol, quotes = points.len(), "yahoo quotes received");
        Ok(points)
    }
}

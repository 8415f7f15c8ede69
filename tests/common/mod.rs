#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use momentum::domain::dashboard::RankingConfig;
use momentum::domain::error::MomentumError;
use momentum::domain::price::PricePoint;
use momentum::domain::settings::Settings;
use momentum::domain::universe::Universe;
use momentum::ports::price_port::PricePort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_series(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    /// Number of `fetch_closes` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MomentumError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MomentumError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn as_of() -> NaiveDate {
    date("2024-06-28")
}

/// Closes at `as_of - 90`, `as_of - 45` and `as_of`.
pub fn three_point(base: f64, mid: f64, last: f64) -> Vec<PricePoint> {
    let d = as_of();
    vec![
        PricePoint::new(d - Duration::days(90), base),
        PricePoint::new(d - Duration::days(45), mid),
        PricePoint::new(d, last),
    ]
}

/// Twenty symbols ranked over 90 and 45 day windows:
///
/// - A and B lead both windows.
/// - X1..X7 lead the 90 day window only, and trail the 45 day one.
/// - Y1..Y7 lead the 45 day window only, and trail the 90 day one.
/// - Z1..Z4 stay flat; Z1 and Z2 fill the worst lists in both windows.
pub fn momentum_fixture() -> Vec<(String, Vec<PricePoint>)> {
    let mut series = vec![
        ("A".to_string(), three_point(100.0, 200.0, 400.0)),
        ("B".to_string(), three_point(100.0, 180.0, 340.0)),
    ];
    for i in 1..=7 {
        series.push((format!("X{i}"), three_point(100.0, 300.0, 250.0)));
    }
    for i in 1..=7 {
        series.push((format!("Y{i}"), three_point(100.0, 50.0, 80.0)));
    }
    for i in 1..=4 {
        series.push((format!("Z{i}"), three_point(100.0, 100.0, 100.0)));
    }
    series
}

pub fn fixture_symbols() -> Vec<String> {
    momentum_fixture().into_iter().map(|(s, _)| s).collect()
}

pub fn fixture_port() -> MockPricePort {
    momentum_fixture()
        .into_iter()
        .fold(MockPricePort::new(), |port, (symbol, points)| {
            port.with_series(&symbol, points)
        })
}

pub fn fixture_settings() -> Settings {
    Settings {
        universe: Universe::new(fixture_symbols()),
        lookback_days: 90,
        ranking: RankingConfig {
            windows: vec![90, 45],
            top_k: 9,
        },
        ..Settings::default()
    }
}

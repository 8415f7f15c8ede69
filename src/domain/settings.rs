//! Resolved screener settings built from a [`ConfigPort`].

use crate::domain::allocation::parse_total_funds;
use crate::domain::config_validation::validate_screen_config;
use crate::domain::dashboard::RankingConfig;
use crate::domain::error::MomentumError;
use crate::domain::fetch::FetchPolicy;
use crate::domain::price_cache::{PriceCache, DEFAULT_MAX_ENTRIES};
use crate::domain::universe::{parse_symbols, Universe};
use crate::ports::config_port::ConfigPort;
use chrono::{Days, NaiveDate};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOTAL_FUNDS: f64 = 10_000.0;
pub const DEFAULT_THROTTLE_MS: u64 = 200;
pub const DEFAULT_REPORT_OUTPUT: &str = "momentum.html";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub universe: Universe,
    pub source: SourceKind,
    pub csv_dir: Option<PathBuf>,
    pub lookback_days: u32,
    pub throttle: Duration,
    pub on_error: FetchPolicy,
    pub ranking: RankingConfig,
    pub total_funds: f64,
    pub cache_max_age: Option<Duration>,
    pub cache_max_entries: usize,
    pub report_output: String,
    pub listen: String,
}

impl Default for Settings {
    fn default() -> Self {
        let ranking = RankingConfig::default();
        Self {
            universe: Universe::default(),
            source: SourceKind::Yahoo,
            csv_dir: None,
            lookback_days: ranking.longest_window(),
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            on_error: FetchPolicy::Abort,
            ranking,
            total_funds: DEFAULT_TOTAL_FUNDS,
            cache_max_age: None,
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            report_output: DEFAULT_REPORT_OUTPUT.to_string(),
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl Settings {
    /// Validate then resolve every key, falling back to defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MomentumError> {
        validate_screen_config(config)?;
        let defaults = Self::default();

        let universe = match config.get_string("universe", "symbols") {
            Some(raw) => Universe::new(parse_symbols(&raw)?),
            None => defaults.universe,
        };

        let source = match config.get_string("data", "source").as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("csv") => SourceKind::Csv,
            _ => SourceKind::Yahoo,
        };

        let ranking = match config.get_list("ranking", "windows") {
            Some(tokens) => RankingConfig {
                windows: tokens
                    .iter()
                    .map(|t| t.parse::<u32>())
                    .collect::<Result<_, _>>()
                    .map_err(|e| {
                        MomentumError::config_invalid("ranking", "windows", e.to_string())
                    })?,
                top_k: config.get_int("ranking", "top_k", defaults.ranking.top_k as i64) as usize,
            },
            None => RankingConfig {
                top_k: config.get_int("ranking", "top_k", defaults.ranking.top_k as i64) as usize,
                ..defaults.ranking
            },
        };
        let lookback_days =
            config.get_int("data", "lookback_days", i64::from(ranking.longest_window())) as u32;

        let on_error = match config.get_string("data", "on_error") {
            Some(raw) => raw
                .parse()
                .map_err(|e: String| MomentumError::config_invalid("data", "on_error", e))?,
            None => defaults.on_error,
        };

        let total_funds = match config.get_string("allocation", "total_funds") {
            Some(raw) => parse_total_funds(&raw)?,
            None => defaults.total_funds,
        };

        let cache_max_age = match config.get_int("cache", "max_age_secs", 0) {
            0 => None,
            secs => Some(Duration::from_secs(secs as u64)),
        };

        Ok(Self {
            universe,
            source,
            csv_dir: config
                .get_string("data", "csv_dir")
                .map(|d| PathBuf::from(d.trim())),
            lookback_days,
            throttle: Duration::from_millis(
                config.get_int("data", "throttle_ms", DEFAULT_THROTTLE_MS as i64) as u64,
            ),
            on_error,
            ranking,
            total_funds,
            cache_max_age,
            cache_max_entries: config.get_int(
                "cache",
                "max_entries",
                defaults.cache_max_entries as i64,
            ) as usize,
            report_output: config
                .get_string("report", "output")
                .unwrap_or(defaults.report_output),
            listen: config
                .get_string("web", "listen")
                .map(|l| l.trim().to_string())
                .unwrap_or(defaults.listen),
        })
    }

    /// First date a fetch must cover for every window ending at `as_of`.
    pub fn fetch_start(&self, as_of: NaiveDate) -> NaiveDate {
        as_of
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn new_cache(&self) -> PriceCache {
        PriceCache::new(self.cache_max_age, self.cache_max_entries)
    }
}

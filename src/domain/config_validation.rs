//! Configuration validation.
//!
//! Checks every screener key before a run so a bad value fails fast with the
//! section and key that caused it. Absent keys fall back to their defaults and
//! are not errors, except `[data] csv_dir` when the source is `csv`.

use crate::domain::allocation::parse_total_funds;
use crate::domain::dashboard::RankingConfig;
use crate::domain::error::MomentumError;
use crate::domain::fetch::FetchPolicy;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    validate_universe(config)?;
    validate_source(config)?;
    validate_fetch_policy(config)?;
    validate_throttle(config)?;
    let longest = validate_windows(config)?;
    validate_lookback(config, longest)?;
    validate_top_k(config)?;
    validate_total_funds(config)?;
    validate_cache(config)?;
    validate_report(config)?;
    validate_listen(config)?;
    Ok(())
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if let Some(raw) = config.get_string("universe", "symbols") {
        parse_symbols(&raw)
            .map_err(|e| MomentumError::config_invalid("universe", "symbols", e.to_string()))?;
    }
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "yahoo".to_string());
    match source.trim().to_lowercase().as_str() {
        "yahoo" => Ok(()),
        "csv" => match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(MomentumError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        other => Err(MomentumError::config_invalid(
            "data",
            "source",
            format!("unknown source '{other}' (expected yahoo or csv)"),
        )),
    }
}

fn validate_fetch_policy(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if let Some(raw) = config.get_string("data", "on_error") {
        raw.parse::<FetchPolicy>()
            .map_err(|e| MomentumError::config_invalid("data", "on_error", e))?;
    }
    Ok(())
}

fn validate_throttle(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if config.get_int("data", "throttle_ms", 0) < 0 {
        return Err(MomentumError::config_invalid(
            "data",
            "throttle_ms",
            "throttle_ms must be non-negative",
        ));
    }
    Ok(())
}

/// Upper bound on any window or lookback, roughly a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Returns the longest configured window.
fn validate_windows(config: &dyn ConfigPort) -> Result<u32, MomentumError> {
    let Some(raw) = config.get_list("ranking", "windows") else {
        return Ok(RankingConfig::default().longest_window());
    };
    if raw.is_empty() {
        return Err(MomentumError::config_invalid(
            "ranking",
            "windows",
            "at least one window is required",
        ));
    }
    let mut longest = 0;
    for token in &raw {
        let days: u32 = token.parse().map_err(|_| {
            MomentumError::config_invalid(
                "ranking",
                "windows",
                format!("'{token}' is not a day count"),
            )
        })?;
        if days == 0 || days > MAX_WINDOW_DAYS {
            return Err(MomentumError::config_invalid(
                "ranking",
                "windows",
                format!("windows must be between 1 and {MAX_WINDOW_DAYS} days"),
            ));
        }
        longest = longest.max(days);
    }
    Ok(longest)
}

fn validate_lookback(config: &dyn ConfigPort, longest: u32) -> Result<(), MomentumError> {
    let lookback = config.get_int("data", "lookback_days", i64::from(longest));
    if lookback < i64::from(longest) {
        return Err(MomentumError::config_invalid(
            "data",
            "lookback_days",
            format!("lookback_days must cover the longest window ({longest} days)"),
        ));
    }
    if lookback > i64::from(MAX_WINDOW_DAYS) {
        return Err(MomentumError::config_invalid(
            "data",
            "lookback_days",
            format!("lookback_days must be at most {MAX_WINDOW_DAYS}"),
        ));
    }
    Ok(())
}

fn validate_top_k(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if config.get_int("ranking", "top_k", 9) < 1 {
        return Err(MomentumError::config_invalid(
            "ranking",
            "top_k",
            "top_k must be at least 1",
        ));
    }
    Ok(())
}

fn validate_total_funds(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if let Some(raw) = config.get_string("allocation", "total_funds") {
        parse_total_funds(&raw).map_err(|e| {
            MomentumError::config_invalid("allocation", "total_funds", e.to_string())
        })?;
    }
    Ok(())
}

fn validate_cache(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if config.get_int("cache", "max_age_secs", 0) < 0 {
        return Err(MomentumError::config_invalid(
            "cache",
            "max_age_secs",
            "max_age_secs must be non-negative",
        ));
    }
    if config.get_int("cache", "max_entries", 16) < 1 {
        return Err(MomentumError::config_invalid(
            "cache",
            "max_entries",
            "max_entries must be at least 1",
        ));
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    match config.get_string("report", "output") {
        Some(path) if path.trim().is_empty() => Err(MomentumError::config_invalid(
            "report",
            "output",
            "output path must not be empty",
        )),
        _ => Ok(()),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), MomentumError> {
    if let Some(raw) = config.get_string("web", "listen") {
        raw.trim().parse::<SocketAddr>().map_err(|_| {
            MomentumError::config_invalid("web", "listen", format!("'{raw}' is not host:port"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: &MomentumError) -> Option<&str> {
        match err {
            MomentumError::ConfigInvalid { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert!(validate_screen_config(&make_config("")).is_ok());
    }

    #[test]
    fn full_config_passes() {
        let config = make_config(
            r#"
[universe]
symbols = TCS.NS, INFY.NS, HDFCBANK.NS

[data]
source = csv
csv_dir = ./prices
lookback_days = 400
throttle_ms = 250
on_error = skip

[ranking]
windows = 360, 180, 90, 45
top_k = 9

[allocation]
total_funds = 25000

[cache]
max_age_secs = 900
max_entries = 8

[report]
output = out.html

[web]
listen = 0.0.0.0:8080
"#,
        );
        assert!(validate_screen_config(&config).is_ok());
    }

    #[test]
    fn duplicate_universe_symbol_fails() {
        let err = validate_screen_config(&make_config("[universe]\nsymbols = A, B, a\n"))
            .unwrap_err();
        assert_eq!(invalid_key(&err), Some("symbols"));
    }

    #[test]
    fn unknown_source_fails() {
        let err = validate_screen_config(&make_config("[data]\nsource = bloomberg\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("source"));
    }

    #[test]
    fn csv_source_requires_dir() {
        let err = validate_screen_config(&make_config("[data]\nsource = csv\n")).unwrap_err();
        assert!(matches!(err, MomentumError::ConfigMissing { ref key, .. } if key == "csv_dir"));
    }

    #[test]
    fn unknown_policy_fails() {
        let err = validate_screen_config(&make_config("[data]\non_error = retry\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("on_error"));
    }

    #[test]
    fn negative_throttle_fails() {
        let err = validate_screen_config(&make_config("[data]\nthrottle_ms = -1\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("throttle_ms"));
    }

    #[test]
    fn zero_window_fails() {
        let err = validate_screen_config(&make_config("[ranking]\nwindows = 90, 0\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("windows"));
    }

    #[test]
    fn non_numeric_window_fails() {
        let err =
            validate_screen_config(&make_config("[ranking]\nwindows = 90, month\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("windows"));
    }

    #[test]
    fn window_beyond_a_century_fails() {
        let err =
            validate_screen_config(&make_config("[ranking]\nwindows = 90, 40000\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("windows"));

        let err = validate_screen_config(&make_config("[ranking]\nwindows = 4000000000\n"))
            .unwrap_err();
        assert_eq!(invalid_key(&err), Some("windows"));
    }

    #[test]
    fn longest_allowed_window_passes() {
        let config = make_config("[ranking]\nwindows = 36500\n[data]\nlookback_days = 36500\n");
        assert!(validate_screen_config(&config).is_ok());
    }

    #[test]
    fn lookback_beyond_a_century_fails() {
        let err = validate_screen_config(&make_config(
            "[ranking]\nwindows = 90\n[data]\nlookback_days = 100000\n",
        ))
        .unwrap_err();
        assert_eq!(invalid_key(&err), Some("lookback_days"));
    }

    #[test]
    fn empty_window_list_fails() {
        let err = validate_screen_config(&make_config("[ranking]\nwindows = ,\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("windows"));
    }

    #[test]
    fn short_lookback_fails() {
        let err = validate_screen_config(&make_config(
            "[ranking]\nwindows = 180, 45\n[data]\nlookback_days = 100\n",
        ))
        .unwrap_err();
        assert_eq!(invalid_key(&err), Some("lookback_days"));
    }

    #[test]
    fn zero_top_k_fails() {
        let err = validate_screen_config(&make_config("[ranking]\ntop_k = 0\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("top_k"));
    }

    #[test]
    fn bad_funds_fail() {
        for funds in ["0", "-10", "lots"] {
            let err = validate_screen_config(&make_config(&format!(
                "[allocation]\ntotal_funds = {funds}\n"
            )))
            .unwrap_err();
            assert_eq!(invalid_key(&err), Some("total_funds"), "funds = {funds}");
        }
    }

    #[test]
    fn zero_cache_entries_fails() {
        let err = validate_screen_config(&make_config("[cache]\nmax_entries = 0\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("max_entries"));
    }

    #[test]
    fn bad_listen_address_fails() {
        let err = validate_screen_config(&make_config("[web]\nlisten = localhost\n")).unwrap_err();
        assert_eq!(invalid_key(&err), Some("listen"));
    }
}

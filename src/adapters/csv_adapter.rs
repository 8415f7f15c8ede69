//! CSV snapshot adapter: one `<SYMBOL>.csv` file per symbol.
//!
//! Files carry a header with a `date` column (YYYY-MM-DD) and either an
//! `adj_close` or a `close` column. An empty price cell is a null.

use crate::domain::error::MomentumError;
use crate::domain::price::PricePoint;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    /// Symbols with a snapshot file in the directory, sorted.
    pub fn list_symbols(&self) -> Result<Vec<String>, MomentumError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MomentumError::DataSource {
            reason: format!("failed to read directory {}: {e}", self.base_path.display()),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MomentumError::DataSource {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    /// Write `points` as `<SYMBOL>.csv`, replacing any existing snapshot.
    pub fn write_series(
        &self,
        symbol: &str,
        points: &[PricePoint],
    ) -> Result<PathBuf, MomentumError> {
        fs::create_dir_all(&self.base_path)?;
        let path = self.csv_path(symbol);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| MomentumError::DataSource {
            reason: format!("failed to create {}: {e}", path.display()),
        })?;

        let write_err = |e: csv::Error| MomentumError::DataSource {
            reason: format!("failed to write {}: {e}", path.display()),
        };
        writer.write_record(["date", "adj_close"]).map_err(write_err)?;
        for point in points {
            let close = point.close.map(|c| c.to_string()).unwrap_or_default();
            writer
                .write_record([point.date.format("%Y-%m-%d").to_string(), close])
                .map_err(write_err)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

impl PricePort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, MomentumError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| MomentumError::DataSource {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| MomentumError::DataSource {
                reason: format!("CSV header error in {}: {e}", path.display()),
            })?
            .clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date_col = column("date").ok_or_else(|| MomentumError::DataSource {
            reason: format!("{} has no date column", path.display()),
        })?;
        let close_col = column("adj_close")
            .or_else(|| column("close"))
            .ok_or_else(|| MomentumError::DataSource {
                reason: format!("{} has no adj_close or close column", path.display()),
            })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| MomentumError::DataSource {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                MomentumError::DataSource {
                    reason: format!("invalid date {date_str:?}: {e}"),
                }
            })?;
            if date < start || date > end {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let point = if close_str.is_empty() {
                PricePoint::missing(date)
            } else {
                let close: f64 = close_str.parse().map_err(|e| MomentumError::DataSource {
                    reason: format!("invalid close value {close_str:?}: {e}"),
                })?;
                PricePoint::new(date, close)
            };
            points.push(point);
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("TCS.NS.csv"),
            "date,open,close,adj_close\n\
             2024-01-17,3700,3710,3705.5\n\
             2024-01-15,3600,3610,3605.5\n\
             2024-01-16,3650,3660,\n",
        )
        .unwrap();
        fs::write(
            path.join("INFY.NS.csv"),
            "Date,Close\n2024-01-15,1500\n2024-01-16,1510\n",
        )
        .unwrap();
        fs::write(path.join("BAD.NS.csv"), "day,price\n2024-01-15,1\n").unwrap();
        fs::write(path.join("notes.txt"), "not a snapshot").unwrap();

        (dir, path)
    }

    #[test]
    fn prefers_adj_close_and_sorts() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_closes("TCS.NS", day(1), day(31)).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PricePoint::new(day(15), 3605.5));
        assert_eq!(points[1], PricePoint::missing(day(16)));
        assert_eq!(points[2].close, Some(3705.5));
    }

    #[test]
    fn falls_back_to_close_column() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_closes("INFY.NS", day(1), day(31)).unwrap();
        assert_eq!(points.iter().filter_map(|p| p.close).collect::<Vec<_>>(), vec![1500.0, 1510.0]);
    }

    #[test]
    fn filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_closes("TCS.NS", day(16), day(16)).unwrap();
        assert_eq!(points, vec![PricePoint::missing(day(16))]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_closes("XYZ.NS", day(1), day(31)),
            Err(MomentumError::DataSource { .. })
        ));
    }

    #[test]
    fn missing_columns_are_an_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_closes("BAD.NS", day(1), day(31)).is_err());
    }

    #[test]
    fn list_symbols_reads_csv_files() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BAD.NS", "INFY.NS", "TCS.NS"]);
    }

    #[test]
    fn written_snapshot_reads_back() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().join("snap"));
        let points = vec![
            PricePoint::new(day(2), 10.25),
            PricePoint::missing(day(3)),
            PricePoint::new(day(4), 11.0),
        ];

        let path = adapter.write_series("HDFCBANK.NS", &points).unwrap();
        assert!(path.ends_with("HDFCBANK.NS.csv"));
        assert_eq!(adapter.fetch_closes("HDFCBANK.NS", day(1), day(31)).unwrap(), points);
    }
}

//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume` and ISO dates.

use crate::domain::error::GrowthallocError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<OhlcvBar>, GrowthallocError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| GrowthallocError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| GrowthallocError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let line = row + 2;
            let date_str = field(&record, 0, "date", line)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                GrowthallocError::DataSource {
                    reason: format!("line {}: invalid date {:?}: {}", line, date_str, e),
                }
            })?;

            let bar = OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: parse(&record, 1, "open", line)?,
                high: parse(&record, 2, "high", line)?,
                low: parse(&record, 3, "low", line)?,
                close: parse(&record, 4, "close", line)?,
                volume: parse(&record, 5, "volume", line)?,
            };
            // "NaN" and "inf" parse as f64
            if !bar.is_finite() {
                return Err(GrowthallocError::DataSource {
                    reason: format!("line {}: non-finite price in {}", line, path.display()),
                });
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, GrowthallocError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| GrowthallocError::DataSource {
            reason: format!("line {}: missing {} column", line, name),
        })
}

fn parse<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<T, GrowthallocError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    field(record, index, name, line)?
        .parse()
        .map_err(|e| GrowthallocError::DataSource {
            reason: format!("line {}: invalid {} value: {}", line, name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, GrowthallocError> {
        let mut bars = self.read_all(symbol)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, GrowthallocError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| GrowthallocError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GrowthallocError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GrowthallocError> {
        let bars = self.read_all(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(path.join("MSFT.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_ohlcv("AAPL", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(2024, 1, 15));
        assert_eq!(bars[0].symbol, "AAPL");
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[2].date, date(2024, 1, 17));
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_ohlcv("AAPL", date(2024, 1, 16), date(2024, 1, 16))
            .unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(2024, 1, 16));
    }

    #[test]
    fn fetch_ohlcv_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_ohlcv("XYZ", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(GrowthallocError::DataSource { .. })));
    }

    #[test]
    fn fetch_ohlcv_reports_bad_value() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("TSLA.csv"),
            "date,open,high,low,close,volume\n2024-01-02,1.0,2.0,0.5,abc,100\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter
            .fetch_ohlcv("TSLA", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap_err();
        assert!(err.to_string().contains("line 2: invalid close value"), "{err}");
    }

    #[test]
    fn fetch_ohlcv_rejects_non_finite_price() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ENPH.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-02,1.0,2.0,0.5,1.5,100\n\
             2024-01-03,1.0,inf,0.5,NaN,100\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter
            .fetch_ohlcv("ENPH", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap_err();
        assert!(err.to_string().contains("line 3: non-finite price"), "{err}");
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn data_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(
            adapter.get_data_range("AAPL").unwrap(),
            Some((date(2024, 1, 15), date(2024, 1, 17), 3))
        );
        assert_eq!(adapter.get_data_range("MSFT").unwrap(), None);
    }
}

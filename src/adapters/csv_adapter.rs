//! CSV file market data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` with a `date,close` header (extra
//! columns ignored). Useful offline and in tests.

use crate::domain::error::ProviderError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const PROVIDER: &str = "csv";

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// File for `symbol`, or `None` when the symbol would leave the base directory.
    fn csv_path(&self, symbol: &str) -> Option<PathBuf> {
        if symbol.is_empty() || symbol.contains(['/', '\\']) {
            return None;
        }
        Some(self.base_path.join(format!("{}.csv", symbol)))
    }
}

fn malformed(reason: String) -> ProviderError {
    ProviderError::malformed(PROVIDER, reason)
}

impl MarketDataPort for CsvPriceAdapter {
    fn fetch_closes(&self, symbol: &str, lookback_days: i64) -> Result<PriceSeries, ProviderError> {
        let not_found = || ProviderError::NotFound {
            provider: PROVIDER.to_string(),
            symbol: symbol.to_string(),
        };
        let Some(path) = self.csv_path(symbol) else {
            tracing::warn!(symbol, "symbol is not a plain file name");
            return Err(not_found());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found()
            } else {
                ProviderError::Io {
                    provider: PROVIDER.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                }
            }
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| malformed(format!("CSV header error: {}", e)))?
            .clone();
        let date_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("date"))
            .ok_or_else(|| malformed("missing date column".into()))?;
        let close_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("close"))
            .ok_or_else(|| malformed("missing close column".into()))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_idx)
                .ok_or_else(|| malformed("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| malformed(format!("invalid date format: {}", e)))?;

            let close: f64 = record
                .get(close_idx)
                .ok_or_else(|| malformed("missing close value".into()))?
                .trim()
                .parse()
                .map_err(|e| malformed(format!("invalid close value: {}", e)))?;

            points.push(PricePoint { date, close });
        }

        Ok(PriceSeries::from_unsorted(symbol, points).trailing_days(lookback_days))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

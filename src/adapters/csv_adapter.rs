//! CSV candle data adapter.
//!
//! Reads exchange kline exports, one file per asset at `<dir>/<ASSET>.csv`
//! with a header row and the column layout: open time (epoch ms), open,
//! high, low, close, volume, close time (epoch ms), quote volume, trade
//! count, taker buy base volume, taker buy quote volume.

use crate::domain::bar::CandleBar;
use crate::domain::error::PonderaError;
use crate::domain::series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, asset: &str) -> PathBuf {
        self.base_path.join(format!("{asset}.csv"))
    }

    fn read_bars(&self, asset: &str) -> Result<Vec<CandleBar>, PonderaError> {
        let path = self.csv_path(asset);
        let content = fs::read_to_string(&path).map_err(|e| PonderaError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| PonderaError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let field = |i: usize, name: &str| -> Result<&str, PonderaError> {
                record.get(i).ok_or_else(|| PonderaError::Data {
                    reason: format!("{}: missing {} column", path.display(), name),
                })
            };
            let float = |i: usize, name: &str| -> Result<f64, PonderaError> {
                field(i, name)?.parse().map_err(|e| PonderaError::Data {
                    reason: format!("{}: invalid {} value: {}", path.display(), name, e),
                })
            };
            let integer = |i: usize, name: &str| -> Result<i64, PonderaError> {
                field(i, name)?.parse().map_err(|e| PonderaError::Data {
                    reason: format!("{}: invalid {} value: {}", path.display(), name, e),
                })
            };

            let open_time = timestamp_from_millis(integer(0, "open time")?, &path)?;
            let close_time = timestamp_from_millis(integer(6, "close time")?, &path)?;

            bars.push(CandleBar {
                open_time,
                open: float(1, "open")?,
                high: float(2, "high")?,
                low: float(3, "low")?,
                close: float(4, "close")?,
                volume: float(5, "volume")?,
                close_time,
                quote_volume: float(7, "quote volume")?,
                trade_count: integer(8, "trade count")?,
                taker_buy_base_volume: float(9, "taker buy base volume")?,
                taker_buy_quote_volume: float(10, "taker buy quote volume")?,
            });
        }

        bars.sort_by_key(|b| b.open_time);
        Ok(bars)
    }
}

fn timestamp_from_millis(millis: i64, path: &std::path::Path) -> Result<DateTime<Utc>, PonderaError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| PonderaError::Data {
            reason: format!("{}: timestamp {} out of range", path.display(), millis),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceSeries, PonderaError> {
        let mut bars = self.read_bars(asset)?;
        if let Some(start) = start {
            bars.retain(|b| b.open_time >= start);
        }
        if let Some(end) = end {
            bars.retain(|b| b.open_time <= end);
        }
        if bars.is_empty() {
            return Err(PonderaError::NoData {
                asset: asset.to_string(),
            });
        }
        PriceSeries::new(asset.to_string(), bars)
    }

    fn list_assets(&self) -> Result<Vec<String>, PonderaError> {
        let mut assets = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    assets.push(stem.to_string());
                }
            }
        }
        assets.sort();
        Ok(assets)
    }

    fn data_range(
        &self,
        asset: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, PonderaError> {
        if !self.csv_path(asset).exists() {
            return Ok(None);
        }
        let bars = self.read_bars(asset)?;
        Ok(bars
            .first()
            .zip(bars.last())
            .map(|(first, last)| (first.open_time, last.open_time, bars.len())))
    }
}

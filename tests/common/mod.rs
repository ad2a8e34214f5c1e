//! Shared helpers for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use pondera::domain::bar::CandleBar;
use pondera::domain::error::PonderaError;
use pondera::domain::series::{PriceSeries, PriceSeriesCollection};
use pondera::ports::data_port::DataPort;
use std::collections::BTreeMap;

pub fn day(offset: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i64::from(offset))
}

pub fn make_bar(offset: u32, close: f64) -> CandleBar {
    let open_time = day(offset);
    CandleBar {
        open_time,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000.0,
        close_time: open_time + chrono::Duration::hours(24),
        quote_volume: 1_000.0 * close,
        trade_count: 100,
        taker_buy_base_volume: 500.0,
        taker_buy_quote_volume: 500.0 * close,
    }
}

pub fn make_series(asset: &str, closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i as u32, c))
        .collect();
    PriceSeries::new(asset.to_string(), bars).unwrap()
}

pub fn make_collection(data: &[(&str, &[f64])]) -> PriceSeriesCollection {
    let map: BTreeMap<String, PriceSeries> = data
        .iter()
        .map(|(asset, closes)| (asset.to_string(), make_series(asset, closes)))
        .collect();
    PriceSeriesCollection::new(map).unwrap()
}

/// In-memory DataPort for pipeline tests that bypass the filesystem.
pub struct MockDataPort {
    series: BTreeMap<String, Vec<CandleBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: BTreeMap::new(),
        }
    }

    pub fn with_closes(mut self, asset: &str, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(i as u32, c))
            .collect();
        self.series.insert(asset.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceSeries, PonderaError> {
        let bars = self.series.get(asset).ok_or_else(|| PonderaError::NoData {
            asset: asset.to_string(),
        })?;
        let filtered: Vec<CandleBar> = bars
            .iter()
            .filter(|b| start.is_none_or(|s| b.open_time >= s))
            .filter(|b| end.is_none_or(|e| b.open_time <= e))
            .cloned()
            .collect();
        if filtered.is_empty() {
            return Err(PonderaError::NoData {
                asset: asset.to_string(),
            });
        }
        PriceSeries::new(asset.to_string(), filtered)
    }

    fn list_assets(&self) -> Result<Vec<String>, PonderaError> {
        Ok(self.series.keys().cloned().collect())
    }

    fn data_range(
        &self,
        asset: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, PonderaError> {
        Ok(self.series.get(asset).and_then(|bars| {
            bars.first()
                .zip(bars.last())
                .map(|(f, l)| (f.open_time, l.open_time, bars.len()))
        }))
    }
}

//! Price series containers and alignment checks.
//!
//! A `PriceSeries` holds the bars for one asset with strictly increasing
//! timestamps. A `PriceSeriesCollection` keys series by asset identifier and
//! refuses to exist unless every series shares the exact same timestamp
//! index. Misalignment is an error, never silently repaired.

use crate::domain::bar::CandleBar;
use crate::domain::error::PonderaError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub asset: String,
    bars: Vec<CandleBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting empty input and non-increasing timestamps.
    pub fn new(asset: String, bars: Vec<CandleBar>) -> Result<Self, PonderaError> {
        if bars.is_empty() {
            return Err(PonderaError::NoData { asset });
        }
        for pair in bars.windows(2) {
            if pair[1].open_time <= pair[0].open_time {
                return Err(PonderaError::Alignment {
                    reason: format!(
                        "{} timestamps not strictly increasing at {}",
                        asset, pair[1].open_time
                    ),
                });
            }
        }
        Ok(Self { asset, bars })
    }

    pub fn bars(&self) -> &[CandleBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.open_time).collect()
    }
}

/// Aligned set of price series, keyed by asset. BTreeMap keeps asset order
/// deterministic so repeated runs produce bit-identical output.
#[derive(Debug, Clone)]
pub struct PriceSeriesCollection {
    series: BTreeMap<String, PriceSeries>,
}

impl PriceSeriesCollection {
    pub fn new(series: BTreeMap<String, PriceSeries>) -> Result<Self, PonderaError> {
        if series.is_empty() {
            return Err(PonderaError::Data {
                reason: "no price series supplied".into(),
            });
        }
        let collection = Self { series };
        collection.validate_alignment()?;
        Ok(collection)
    }

    fn validate_alignment(&self) -> Result<(), PonderaError> {
        let mut iter = self.series.values();
        let Some(first) = iter.next() else {
            return Ok(());
        };
        let reference = first.timestamps();
        for other in iter {
            if other.len() != first.len() {
                return Err(PonderaError::Alignment {
                    reason: format!(
                        "{} has {} bars, {} has {}",
                        first.asset,
                        first.len(),
                        other.asset,
                        other.len()
                    ),
                });
            }
            for (i, bar) in other.bars().iter().enumerate() {
                if bar.open_time != reference[i] {
                    return Err(PonderaError::Alignment {
                        reason: format!(
                            "{} and {} diverge at index {}: {} vs {}",
                            first.asset, other.asset, i, reference[i], bar.open_time
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn get(&self, asset: &str) -> Option<&PriceSeries> {
        self.series.get(asset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PriceSeries)> {
        self.series.iter()
    }

    pub fn asset_count(&self) -> usize {
        self.series.len()
    }

    /// Number of periods; identical across assets by construction.
    pub fn period_count(&self) -> usize {
        self.series.values().next().map_or(0, PriceSeries::len)
    }

    /// The shared timestamp index.
    pub fn timeline(&self) -> Vec<DateTime<Utc>> {
        self.series
            .values()
            .next()
            .map_or_else(Vec::new, PriceSeries::timestamps)
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{bar_at, collection, series};
    use super::*;

    #[test]
    fn series_rejects_empty() {
        let result = PriceSeries::new("BTC".into(), vec![]);
        assert!(matches!(result, Err(PonderaError::NoData { .. })));
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let bars = vec![bar_at(1, 100.0), bar_at(1, 101.0)];
        let result = PriceSeries::new("BTC".into(), bars);
        assert!(matches!(result, Err(PonderaError::Alignment { .. })));
    }

    #[test]
    fn series_rejects_decreasing_timestamps() {
        let bars = vec![bar_at(3, 100.0), bar_at(1, 101.0)];
        let result = PriceSeries::new("BTC".into(), bars);
        assert!(matches!(result, Err(PonderaError::Alignment { .. })));
    }

    #[test]
    fn collection_rejects_length_mismatch() {
        let mut map = BTreeMap::new();
        map.insert("BTC".to_string(), series("BTC", &[1.0, 2.0, 3.0]));
        map.insert("ETH".to_string(), series("ETH", &[1.0, 2.0]));
        let result = PriceSeriesCollection::new(map);
        assert!(matches!(result, Err(PonderaError::Alignment { .. })));
    }

    #[test]
    fn collection_rejects_timestamp_mismatch() {
        let mut map = BTreeMap::new();
        map.insert("BTC".to_string(), series("BTC", &[1.0, 2.0]));
        // Same length, shifted dates.
        let shifted = vec![bar_at(2, 1.0), bar_at(3, 2.0)];
        map.insert(
            "ETH".to_string(),
            PriceSeries::new("ETH".into(), shifted).unwrap(),
        );
        let result = PriceSeriesCollection::new(map);
        assert!(matches!(result, Err(PonderaError::Alignment { .. })));
    }

    #[test]
    fn collection_rejects_empty() {
        let result = PriceSeriesCollection::new(BTreeMap::new());
        assert!(matches!(result, Err(PonderaError::Data { .. })));
    }

    #[test]
    fn aligned_collection_exposes_timeline() {
        let coll = collection(&[("BTC", &[1.0, 2.0, 3.0]), ("ETH", &[4.0, 5.0, 6.0])]);
        assert_eq!(coll.asset_count(), 2);
        assert_eq!(coll.period_count(), 3);
        assert_eq!(coll.timeline().len(), 3);
        let assets: Vec<&str> = coll.assets().collect();
        assert_eq!(assets, vec!["BTC", "ETH"]);
    }
}

//! Price data access port trait.
//!
//! Whatever fetched or stored the candles (exchange APIs, files) sits behind
//! this trait; the core only sees validated `PriceSeries` values.

use crate::domain::error::PonderaError;
use crate::domain::series::PriceSeries;
use chrono::{DateTime, Utc};

pub trait DataPort {
    /// Bars for one asset within `[start, end]`, sorted ascending by open
    /// time.
    fn fetch_prices(
        &self,
        asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceSeries, PonderaError>;

    fn list_assets(&self) -> Result<Vec<String>, PonderaError>;

    /// First timestamp, last timestamp and bar count for an asset, or `None`
    /// when no data exists.
    fn data_range(
        &self,
        asset: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, PonderaError>;
}

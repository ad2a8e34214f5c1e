//! Candle bar representation.
//!
//! Field layout matches the exchange kline format the data adapters consume:
//! open/close timestamps plus OHLCV and taker-side volume breakdowns.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct CandleBar {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
    pub quote_volume: f64,
    pub trade_count: i64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl CandleBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Taker buy share of total base volume, 0 when the bar traded nothing.
    pub fn taker_buy_ratio(&self) -> f64 {
        if self.volume > 0.0 {
            self.taker_buy_base_volume / self.volume
        } else {
            0.0
        }
    }
}

//! Simple-return computation over an aligned price collection.

use crate::domain::error::PonderaError;
use crate::domain::series::PriceSeriesCollection;
use std::collections::BTreeMap;

/// Per-asset simple returns aligned 1:1 with the price index.
pub type ReturnsByAsset = BTreeMap<String, Vec<f64>>;

/// `r[t] = p[t]/p[t-1] - 1` for `t > 0`; the first period has no prior
/// observation and is defined as 0.
pub fn compute_returns(prices: &PriceSeriesCollection) -> Result<ReturnsByAsset, PonderaError> {
    let mut returns = BTreeMap::new();
    for (asset, series) in prices.iter() {
        let closes = series.closes();
        let mut r = Vec::with_capacity(closes.len());
        r.push(0.0);
        for pair in closes.windows(2) {
            r.push(pair[1] / pair[0] - 1.0);
        }
        returns.insert(asset.clone(), r);
    }
    Ok(returns)
}

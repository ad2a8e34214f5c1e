//! Momentum weight allocator.
//!
//! A deterministic single-pass scan over the timestamp index. The weight
//! vector starts equal-weighted and is reassessed every `period` ticks by a
//! pure reducer; between rebalance ticks it is carried forward unchanged, so
//! the recorded series is piecewise-constant. The decision at tick `t` only
//! looks at returns at `t` and `t - period` — no lookahead.

use crate::domain::error::PonderaError;
use crate::domain::returns::{ReturnsByAsset, compute_returns};
use crate::domain::series::PriceSeriesCollection;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One weight per asset; non-negative, summing to 1.
pub type Weights = BTreeMap<String, f64>;

#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Additive weight adjustment applied at each rebalance tick.
    pub step: f64,
    /// Rebalance cadence in ticks; the momentum signal looks back this far.
    pub period: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            period: 2,
        }
    }
}

/// Weight vectors recorded at every timestamp of the backtest window.
#[derive(Debug, Clone)]
pub struct WeightSeries {
    timestamps: Vec<DateTime<Utc>>,
    weights: Vec<Weights>,
}

impl WeightSeries {
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn at(&self, t: usize) -> &Weights {
        &self.weights[t]
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &Weights)> {
        self.timestamps.iter().zip(self.weights.iter())
    }
}

/// `1/N` across the given assets.
pub fn equal_weights<'a>(assets: impl Iterator<Item = &'a str>) -> Weights {
    let assets: Vec<&str> = assets.collect();
    let w = 1.0 / assets.len() as f64;
    assets.into_iter().map(|a| (a.to_string(), w)).collect()
}

/// Pure rebalance reducer: one additive step per asset, clamped to [0, 1],
/// then renormalized to sum 1.
///
/// A zero signal is treated as non-positive and decreases the weight; this
/// strict greater-than tie-break is deliberate and must not be changed to a
/// hold without product sign-off.
pub fn step_weights(
    prev: &Weights,
    signals: &Weights,
    step: f64,
    timestamp: DateTime<Utc>,
) -> Result<Weights, PonderaError> {
    let mut next = Weights::new();
    let mut total = 0.0;
    for (asset, &w) in prev {
        let signal = signals.get(asset).copied().unwrap_or(0.0);
        let adjusted = if signal > 0.0 {
            (w + step).min(1.0)
        } else {
            (w - step).max(0.0)
        };
        total += adjusted;
        next.insert(asset.clone(), adjusted);
    }
    if total == 0.0 {
        return Err(PonderaError::DegenerateWeights { timestamp });
    }
    for w in next.values_mut() {
        *w /= total;
    }
    Ok(next)
}

/// Runs the allocator over an aligned price collection, recording the
/// current weight vector at every timestamp.
pub fn allocate(
    prices: &PriceSeriesCollection,
    config: &AllocatorConfig,
) -> Result<WeightSeries, PonderaError> {
    let returns = compute_returns(prices)?;
    let timeline = prices.timeline();
    let mut current = equal_weights(prices.assets());
    let mut weights = Vec::with_capacity(timeline.len());

    for (t, &timestamp) in timeline.iter().enumerate() {
        if t > 0 && t % config.period == 0 {
            let signals = momentum_signals(&returns, t, config.period);
            current = step_weights(&current, &signals, config.step, timestamp)?;
        }
        weights.push(current.clone());
    }

    Ok(WeightSeries {
        timestamps: timeline,
        weights,
    })
}

/// Two-point cumulative return signal: `r[t] - r[t - lookback]`.
fn momentum_signals(returns: &ReturnsByAsset, t: usize, lookback: usize) -> Weights {
    returns
        .iter()
        .map(|(asset, r)| (asset.clone(), r[t] - r[t - lookback]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::testutil::collection;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn weights_of(pairs: &[(&str, f64)]) -> Weights {
        pairs.iter().map(|(a, w)| (a.to_string(), *w)).collect()
    }

    #[test]
    fn equal_weights_two_assets() {
        let w = equal_weights(["BTC", "ETH"].into_iter());
        assert!((w["BTC"] - 0.5).abs() < 1e-12);
        assert!((w["ETH"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn step_increases_on_positive_signal() {
        let prev = weights_of(&[("BTC", 0.5), ("ETH", 0.5)]);
        let signals = weights_of(&[("BTC", 0.01), ("ETH", -0.01)]);
        let next = step_weights(&prev, &signals, 0.1, ts()).unwrap();
        assert!((next["BTC"] - 0.6).abs() < 1e-12);
        assert!((next["ETH"] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn zero_signal_decreases() {
        let prev = weights_of(&[("BTC", 0.5), ("ETH", 0.5)]);
        let signals = weights_of(&[("BTC", 0.0), ("ETH", 0.02)]);
        let next = step_weights(&prev, &signals, 0.1, ts()).unwrap();
        // 0.4 and 0.6 renormalize to themselves.
        assert!((next["BTC"] - 0.4).abs() < 1e-12);
        assert!((next["ETH"] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn clamps_at_bounds_then_renormalizes() {
        let prev = weights_of(&[("BTC", 0.95), ("ETH", 0.05)]);
        let signals = weights_of(&[("BTC", 0.5), ("ETH", -0.5)]);
        let next = step_weights(&prev, &signals, 0.1, ts()).unwrap();
        // BTC clamps to 1.0, ETH floors at 0.0; sum already 1.
        assert!((next["BTC"] - 1.0).abs() < 1e-12);
        assert!((next["ETH"] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn all_zero_weights_is_degenerate() {
        let prev = weights_of(&[("BTC", 0.05), ("ETH", 0.05)]);
        let signals = weights_of(&[("BTC", -1.0), ("ETH", -1.0)]);
        let result = step_weights(&prev, &signals, 0.1, ts());
        assert!(matches!(
            result,
            Err(PonderaError::DegenerateWeights { .. })
        ));
    }

    #[test]
    fn single_asset_always_weight_one() {
        let coll = collection(&[("BTC", &[100.0, 102.0, 101.0, 105.0, 107.0])]);
        let weights = allocate(&coll, &AllocatorConfig::default()).unwrap();
        assert_eq!(weights.len(), 5);
        for t in 0..weights.len() {
            assert!((weights.at(t)["BTC"] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn weights_constant_between_rebalances() {
        let coll = collection(&[
            ("BTC", &[100.0, 102.0, 101.0, 105.0, 107.0][..]),
            ("ETH", &[50.0, 49.0, 52.0, 53.0, 50.0][..]),
        ]);
        let weights = allocate(&coll, &AllocatorConfig::default()).unwrap();
        // t=0 and t=1 share the initial vector; t=2 and t=3 share the first
        // rebalanced vector.
        assert_eq!(weights.at(0), weights.at(1));
        assert_eq!(weights.at(2), weights.at(3));
        assert!((weights.at(0)["BTC"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn short_window_keeps_initial_weights() {
        // Fewer than period + 1 bars: no rebalance tick is reachable.
        let coll = collection(&[
            ("BTC", &[100.0, 102.0][..]),
            ("ETH", &[50.0, 49.0][..]),
        ]);
        let weights = allocate(&coll, &AllocatorConfig::default()).unwrap();
        assert_eq!(weights.len(), 2);
        for t in 0..2 {
            assert!((weights.at(t)["BTC"] - 0.5).abs() < 1e-12);
            assert!((weights.at(t)["ETH"] - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn weights_always_sum_to_one() {
        let coll = collection(&[
            ("BTC", &[100.0, 102.0, 101.0, 105.0, 107.0, 104.0, 110.0][..]),
            ("ETH", &[50.0, 49.0, 52.0, 53.0, 50.0, 55.0, 57.0][..]),
        ]);
        let weights = allocate(&coll, &AllocatorConfig::default()).unwrap();
        for t in 0..weights.len() {
            let sum: f64 = weights.at(t).values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum at t={t} was {sum}");
            for &w in weights.at(t).values() {
                assert!((0.0..=1.0).contains(&w));
            }
        }
    }
}

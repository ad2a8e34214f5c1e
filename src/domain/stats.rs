//! Performance statistics engine.
//!
//! Consumes the portfolio return series and produces a fixed report of
//! eleven risk/performance metrics. Every metric is a pure function of the
//! return series, the annual risk-free rate and the periods-per-year scale;
//! the report is built once, in order, and never mutated.
//!
//! Two definitions here are deliberately unconventional and match the
//! reference behavior exactly:
//! - drawdown runs over the raw return series, not a cumulative equity
//!   curve, with 0/0 points excluded from the minimum;
//! - downside volatility subtracts the *annual* risk-free rate from
//!   per-period returns, not the per-period-converted rate.
//! Neither may be "corrected" without product sign-off.

use crate::domain::error::PonderaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Annual risk-free rate.
    pub risk_free_rate: f64,
    /// Periods per year; configuration, never derived from timestamps.
    pub scale: u32,
}

/// The eleven report metrics. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    #[serde(rename = "Annual Return")]
    pub annual_return: f64,
    #[serde(rename = "Annual Volatility")]
    pub annual_volatility: f64,
    #[serde(rename = "Sharpe Ratio")]
    pub sharpe_ratio: f64,
    #[serde(rename = "Skewness")]
    pub skewness: f64,
    #[serde(rename = "Kurtosis")]
    pub kurtosis: f64,
    #[serde(rename = "Semi-Deviation")]
    pub semi_deviation: f64,
    #[serde(rename = "Historical VaR")]
    pub historical_var: f64,
    #[serde(rename = "Maximum Drawdown")]
    pub maximum_drawdown: f64,
    #[serde(rename = "Downside Volatility")]
    pub downside_volatility: f64,
    #[serde(rename = "Sortino Ratio")]
    pub sortino_ratio: f64,
    #[serde(rename = "Calmar Ratio")]
    pub calmar_ratio: f64,
}

impl PerformanceReport {
    pub fn compute(returns: &[f64], config: &StatsConfig) -> Result<Self, PonderaError> {
        if returns.is_empty() {
            return Err(PonderaError::Data {
                reason: "empty portfolio return series".into(),
            });
        }
        let rf = config.risk_free_rate;
        let scale = f64::from(config.scale);

        let annual_return = annualize(returns, scale);
        let annual_volatility = stdev_sample(returns) * scale.sqrt();

        let rf_per_period = (1.0 + rf).powf(1.0 / scale) - 1.0;
        let excess: Vec<f64> = returns.iter().map(|r| r - rf_per_period).collect();
        let sharpe_ratio = annualize(&excess, scale) / annual_volatility;

        let skewness = standardized_moment(returns, 3);
        let kurtosis = standardized_moment(returns, 4);

        let negatives: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        let semi_deviation = if negatives.is_empty() {
            f64::NAN
        } else {
            stdev_population(&negatives)
        };

        let historical_var = percentile(returns, 5.0);

        let maximum_drawdown = max_drawdown(returns);

        let downside_volatility = {
            let mean_sq = returns
                .iter()
                .map(|r| (r - rf).min(0.0).powi(2))
                .sum::<f64>()
                / returns.len() as f64;
            mean_sq.sqrt()
        };

        if downside_volatility == 0.0 {
            return Err(PonderaError::DivisionByZero {
                metric: "Sortino Ratio".into(),
            });
        }
        let sortino_ratio = annualize(&excess, scale) / downside_volatility;

        if maximum_drawdown == 0.0 {
            return Err(PonderaError::DivisionByZero {
                metric: "Calmar Ratio".into(),
            });
        }
        let calmar_ratio = annual_return / -maximum_drawdown;

        Ok(Self {
            annual_return,
            annual_volatility,
            sharpe_ratio,
            skewness,
            kurtosis,
            semi_deviation,
            historical_var,
            maximum_drawdown,
            downside_volatility,
            sortino_ratio,
            calmar_ratio,
        })
    }
}

/// Compounds the whole series, then rescales the exponent by `scale / n`.
fn annualize(returns: &[f64], scale: f64) -> f64 {
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    growth.powf(scale / returns.len() as f64) - 1.0
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1); NaN below two observations.
fn stdev_sample(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Population standard deviation (ddof = 0).
fn stdev_population(values: &[f64]) -> f64 {
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// `mean((r - mean)^k) / popstdev^k`; k=3 is skewness, k=4 raw kurtosis.
fn standardized_moment(values: &[f64], k: i32) -> f64 {
    let m = mean(values);
    let moment = values.iter().map(|v| (v - m).powi(k)).sum::<f64>() / values.len() as f64;
    moment / stdev_population(values).powi(k)
}

/// Linear-interpolated percentile over the empirical distribution.
fn percentile(values: &[f64], level: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = level / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Drawdown against the running maximum of the raw return series. Points
/// where both the return and the peak are zero produce 0/0 and are skipped,
/// matching how a NaN-aware minimum treats them.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = f64::NAN;
    for &r in returns {
        peak = peak.max(r);
        let dd = (r - peak) / peak;
        if dd.is_nan() {
            continue;
        }
        if worst.is_nan() || dd < worst {
            worst = dd;
        }
    }
    worst
}

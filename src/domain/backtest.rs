//! Backtest configuration and pipeline orchestration.
//!
//! Data flows strictly forward: prices -> returns -> weights -> portfolio
//! returns -> report. Each stage returns a fresh, independently owned value;
//! nothing is mutated after creation, so a rerun on identical inputs is
//! bit-identical.

use crate::domain::aggregate::aggregate_portfolio_returns;
use crate::domain::error::PonderaError;
use crate::domain::momentum::{AllocatorConfig, WeightSeries, allocate};
use crate::domain::returns::compute_returns;
use crate::domain::series::PriceSeriesCollection;
use crate::domain::stats::{PerformanceReport, StatsConfig};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub risk_free_rate: f64,
    pub scale: u32,
    pub rebalance_step: f64,
    pub rebalance_period: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.2,
            scale: 9,
            rebalance_step: 0.1,
            rebalance_period: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub weights: WeightSeries,
    pub portfolio_returns: Vec<f64>,
    pub report: PerformanceReport,
}

pub fn run_backtest(
    prices: &PriceSeriesCollection,
    config: &BacktestConfig,
) -> Result<BacktestResult, PonderaError> {
    let returns = compute_returns(prices)?;

    let allocator = AllocatorConfig {
        step: config.rebalance_step,
        period: config.rebalance_period,
    };
    let weights = allocate(prices, &allocator)?;

    let portfolio_returns = aggregate_portfolio_returns(&returns, &weights)?;

    let stats = StatsConfig {
        risk_free_rate: config.risk_free_rate,
        scale: config.scale,
    };
    let report = PerformanceReport::compute(&portfolio_returns, &stats)?;

    Ok(BacktestResult {
        weights,
        portfolio_returns,
        report,
    })
}

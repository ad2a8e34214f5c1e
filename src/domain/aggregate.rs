//! Portfolio return aggregation.
//!
//! Folds per-asset returns and the weight series into one scalar return per
//! timestamp: `portfolio_return[t] = sum_a w[t][a] * r[a][t]`.

use crate::domain::error::PonderaError;
use crate::domain::momentum::WeightSeries;
use crate::domain::returns::ReturnsByAsset;

pub fn aggregate_portfolio_returns(
    returns: &ReturnsByAsset,
    weights: &WeightSeries,
) -> Result<Vec<f64>, PonderaError> {
    let n = returns.values().next().map_or(0, Vec::len);
    if weights.len() != n {
        return Err(PonderaError::Alignment {
            reason: format!(
                "weight series has {} entries, return series has {}",
                weights.len(),
                n
            ),
        });
    }

    let mut portfolio = Vec::with_capacity(n);
    for (t, (timestamp, w)) in weights.iter().enumerate() {
        if w.len() != returns.len() {
            return Err(PonderaError::Alignment {
                reason: format!("asset sets differ at {timestamp}"),
            });
        }
        let mut total = 0.0;
        for (asset, r) in returns {
            let weight = w.get(asset).ok_or_else(|| PonderaError::Alignment {
                reason: format!("no weight for {asset} at {timestamp}"),
            })?;
            total += weight * r[t];
        }
        portfolio.push(total);
    }
    Ok(portfolio)
}

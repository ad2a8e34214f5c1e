//! Configuration validation.
//!
//! Validates every recognized config field before any data is loaded.

use crate::domain::error::PonderaError;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    validate_assets(config)?;
    validate_risk_free_rate(config)?;
    validate_scale(config)?;
    validate_rebalance_step(config)?;
    validate_rebalance_period(config)?;
    Ok(())
}

/// Parses the comma-separated asset list: uppercased, no empty tokens, no
/// duplicates.
pub fn parse_assets(input: &str) -> Result<Vec<String>, PonderaError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(PonderaError::ConfigInvalid {
                section: "backtest".into(),
                key: "assets".into(),
                reason: "empty token in asset list".into(),
            });
        }
        let asset = trimmed.to_uppercase();
        if !seen.insert(asset.clone()) {
            return Err(PonderaError::ConfigInvalid {
                section: "backtest".into(),
                key: "assets".into(),
                reason: format!("duplicate asset: {asset}"),
            });
        }
        assets.push(asset);
    }

    Ok(assets)
}

fn validate_assets(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    let value =
        config
            .get_string("backtest", "assets")
            .ok_or_else(|| PonderaError::ConfigMissing {
                section: "backtest".into(),
                key: "assets".into(),
            })?;
    parse_assets(&value)?;
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if value < 0.0 || value >= 1.0 {
        return Err(PonderaError::ConfigInvalid {
            section: "backtest".into(),
            key: "risk_free_rate".into(),
            reason: "risk_free_rate must be between 0 and 1".into(),
        });
    }
    Ok(())
}

fn validate_scale(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    let value = config.get_int("backtest", "scale", 9);
    if value < 1 {
        return Err(PonderaError::ConfigInvalid {
            section: "backtest".into(),
            key: "scale".into(),
            reason: "scale must be a positive number of periods per year".into(),
        });
    }
    Ok(())
}

fn validate_rebalance_step(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    let value = config.get_double("backtest", "rebalance_step", 0.1);
    if value <= 0.0 || value > 1.0 {
        return Err(PonderaError::ConfigInvalid {
            section: "backtest".into(),
            key: "rebalance_step".into(),
            reason: "rebalance_step must be in (0, 1]".into(),
        });
    }
    Ok(())
}

fn validate_rebalance_period(config: &dyn ConfigPort) -> Result<(), PonderaError> {
    let value = config.get_int("backtest", "rebalance_period", 2);
    if value < 1 {
        return Err(PonderaError::ConfigInvalid {
            section: "backtest".into(),
            key: "rebalance_period".into(),
            reason: "rebalance_period must be at least 1".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let a = adapter(
            "[backtest]\nassets = btc, eth\nrisk_free_rate = 0.2\nscale = 9\nrebalance_step = 0.1\nrebalance_period = 2\n",
        );
        assert!(validate_backtest_config(&a).is_ok());
    }

    #[test]
    fn defaults_pass_with_assets_only() {
        let a = adapter("[backtest]\nassets = BTC\n");
        assert!(validate_backtest_config(&a).is_ok());
    }

    #[test]
    fn missing_assets_fails() {
        let a = adapter("[backtest]\nscale = 9\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(PonderaError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn negative_rf_fails() {
        let a = adapter("[backtest]\nassets = BTC\nrisk_free_rate = -0.1\n");
        assert!(matches!(
            validate_backtest_config(&a),
            Err(PonderaError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn zero_scale_fails() {
        let a = adapter("[backtest]\nassets = BTC\nscale = 0\n");
        assert!(validate_backtest_config(&a).is_err());
    }

    #[test]
    fn step_above_one_fails() {
        let a = adapter("[backtest]\nassets = BTC\nrebalance_step = 1.5\n");
        assert!(validate_backtest_config(&a).is_err());
    }

    #[test]
    fn zero_period_fails() {
        let a = adapter("[backtest]\nassets = BTC\nrebalance_period = 0\n");
        assert!(validate_backtest_config(&a).is_err());
    }

    #[test]
    fn parse_assets_uppercases_and_trims() {
        let assets = parse_assets(" btc , eth ").unwrap();
        assert_eq!(assets, vec!["BTC", "ETH"]);
    }

    #[test]
    fn parse_assets_rejects_duplicates() {
        assert!(parse_assets("BTC,btc").is_err());
    }

    #[test]
    fn parse_assets_rejects_empty_token() {
        assert!(parse_assets("BTC,,ETH").is_err());
    }
}

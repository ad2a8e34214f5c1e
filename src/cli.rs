//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{BacktestConfig, run_backtest};
use crate::domain::config_validation::{parse_assets, validate_backtest_config};
use crate::domain::error::PonderaError;
use crate::domain::series::{PriceSeries, PriceSeriesCollection};
use crate::domain::stats::PerformanceReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "pondera", about = "Momentum portfolio backtesting analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and write the performance report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured asset list with a single asset
        #[arg(long)]
        asset: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for configured asset(s)
    Info {
        #[arg(long)]
        asset: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            asset,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest_command(&config, output.as_ref(), asset.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { asset, config } => run_info(asset.as_deref(), &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PonderaError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", defaults.risk_free_rate),
        scale: adapter.get_int("backtest", "scale", i64::from(defaults.scale)) as u32,
        rebalance_step: adapter.get_double("backtest", "rebalance_step", defaults.rebalance_step),
        rebalance_period: adapter.get_int(
            "backtest",
            "rebalance_period",
            defaults.rebalance_period as i64,
        ) as usize,
    }
}

pub fn resolve_assets(
    asset_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, PonderaError> {
    if let Some(asset) = asset_override {
        return parse_assets(asset);
    }
    let configured =
        config
            .get_string("backtest", "assets")
            .ok_or_else(|| PonderaError::ConfigMissing {
                section: "backtest".into(),
                key: "assets".into(),
            })?;
    parse_assets(&configured)
}

fn parse_window_bound(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<Option<DateTime<Utc>>, PonderaError> {
    match adapter.get_string("backtest", key) {
        None => Ok(None),
        Some(value) => {
            let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                PonderaError::ConfigInvalid {
                    section: "backtest".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            })?;
            Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()))
        }
    }
}

fn run_backtest_command(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    asset_override: Option<&str>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve assets and data directory
    let assets = match resolve_assets(asset_override, &adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = match adapter.get_string("data", "dir") {
        Some(d) => PathBuf::from(d),
        None => {
            let err = PonderaError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let bt_config = build_backtest_config(&adapter);

    let window = match parse_window_bound(&adapter, "start_date")
        .and_then(|start| parse_window_bound(&adapter, "end_date").map(|end| (start, end)))
    {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3-6: Data-port dependent pipeline
    let data_port = CsvAdapter::new(data_dir);
    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.json"));

    run_backtest_pipeline(&data_port, &assets, window, &bt_config, &output)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    assets: &[String],
    window: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
    config: &BacktestConfig,
    output: &PathBuf,
) -> ExitCode {
    // Stage 3: Fetch and align price series
    eprintln!("Loading {} asset(s)...", assets.len());
    let mut series: BTreeMap<String, PriceSeries> = BTreeMap::new();
    for asset in assets {
        match data_port.fetch_prices(asset, window.0, window.1) {
            Ok(s) => {
                eprintln!("  {}: {} bars", asset, s.len());
                series.insert(asset.clone(), s);
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    let collection = match PriceSeriesCollection::new(series) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Run the pipeline
    eprintln!(
        "Running backtest: {} assets over {} periods",
        collection.asset_count(),
        collection.period_count(),
    );

    let result = match run_backtest(&collection, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Console summary
    print_summary(&result.report);

    // Stage 6: Write report
    match JsonReportAdapter.write(&result.report, output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn print_summary(report: &PerformanceReport) {
    eprintln!("\n=== Performance Report ===");
    eprintln!("Annual Return:       {:.2}%", report.annual_return * 100.0);
    eprintln!(
        "Annual Volatility:   {:.2}%",
        report.annual_volatility * 100.0
    );
    eprintln!("Sharpe Ratio:        {:.2}", report.sharpe_ratio);
    eprintln!("Skewness:            {:.4}", report.skewness);
    eprintln!("Kurtosis:            {:.4}", report.kurtosis);
    eprintln!("Semi-Deviation:      {:.4}", report.semi_deviation);
    eprintln!("Historical VaR:      {:.4}", report.historical_var);
    eprintln!(
        "Maximum Drawdown:    {:.2}%",
        report.maximum_drawdown * 100.0
    );
    eprintln!("Downside Volatility: {:.4}", report.downside_volatility);
    eprintln!("Sortino Ratio:       {:.2}", report.sortino_ratio);
    eprintln!("Calmar Ratio:        {:.2}", report.calmar_ratio);
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let assets = match resolve_assets(None, &adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let config = build_backtest_config(&adapter);

    eprintln!("\nBacktest parameters:");
    eprintln!("  assets:           {}", assets.join(", "));
    eprintln!("  risk_free_rate:   {}", config.risk_free_rate);
    eprintln!("  scale:            {}", config.scale);
    eprintln!("  rebalance_step:   {}", config.rebalance_step);
    eprintln!("  rebalance_period: {}", config.rebalance_period);

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_backtest_config(&adapter) {
        Ok(()) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(asset_override: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let assets = match resolve_assets(asset_override, &adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = match adapter.get_string("data", "dir") {
        Some(d) => PathBuf::from(d),
        None => {
            let err = PonderaError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let data_port = CsvAdapter::new(data_dir);

    for asset in &assets {
        match data_port.data_range(asset) {
            Ok(Some((first, last, count))) => {
                println!("{asset}: {count} bars, {first} to {last}");
            }
            Ok(None) => {
                eprintln!("{asset}: no data found");
            }
            Err(e) => {
                eprintln!("error querying {asset}: {e}");
            }
        }
    }
    ExitCode::SUCCESS
}

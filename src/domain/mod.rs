//! Core domain types and logic.

pub mod aggregate;
pub mod backtest;
pub mod bar;
pub mod config_validation;
pub mod error;
pub mod momentum;
pub mod returns;
pub mod series;
pub mod stats;

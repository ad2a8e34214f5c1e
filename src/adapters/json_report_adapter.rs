//! JSON report adapter implementing ReportPort.
//!
//! Serializes the performance report as pretty-printed JSON; key names and
//! order come from the report struct itself, so output is stable across
//! runs.

use crate::domain::error::PonderaError;
use crate::domain::stats::PerformanceReport;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn render(report: &PerformanceReport) -> Result<String, PonderaError> {
        serde_json::to_string_pretty(report).map_err(|e| PonderaError::Data {
            reason: format!("failed to serialize report: {e}"),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &PerformanceReport, output_path: &Path) -> Result<(), PonderaError> {
        let json = Self::render(report)?;
        fs::write(output_path, json)?;
        Ok(())
    }
}

//! Report output port trait.

use crate::domain::error::PonderaError;
use crate::domain::stats::PerformanceReport;
use std::path::Path;

pub trait ReportPort {
    fn write(&self, report: &PerformanceReport, output_path: &Path) -> Result<(), PonderaError>;
}

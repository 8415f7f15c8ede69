//! Report generation port trait.

use crate::domain::dashboard::Report;
use crate::domain::error::MomentumError;

/// Port for writing a rendered dashboard.
pub trait ReportPort {
    fn write(&self, report: &Report<'_>, output_path: &str) -> Result<(), MomentumError>;
}

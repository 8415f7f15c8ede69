//! HTML report adapter implementing ReportPort.
//!
//! Renders the dashboard to a standalone page with inline SVG charts.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::dashboard_view::DashboardView;
use crate::domain::dashboard::Report;
use crate::domain::error::MomentumError;
use crate::ports::report_port::ReportPort;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub title: &'a str,
    pub view: &'a DashboardView,
    pub interactive: bool,
    pub default_funds: &'a str,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &Report<'_>) -> Result<String, MomentumError> {
        let view = DashboardView::from_report(report);
        let template = DashboardTemplate {
            title: "Momentum dashboard",
            view: &view,
            interactive: false,
            default_funds: "",
        };
        template.render().map_err(|e| MomentumError::Report {
            reason: e.to_string(),
        })
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, report: &Report<'_>, output_path: &str) -> Result<(), MomentumError> {
        let html = self.render(report)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        tracing::info!(path = %path.display(), "report written");

        Ok(())
    }
}

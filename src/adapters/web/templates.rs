//! HTML templates using Askama.

use askama::Template;

use crate::adapters::dashboard_view::ComparisonView;

pub use crate::adapters::html_report_adapter::DashboardTemplate;

pub struct SymbolOption {
    pub symbol: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "compare.html")]
pub struct CompareTemplate<'a> {
    pub title: &'a str,
    pub interactive: bool,
    pub options: Vec<SymbolOption>,
    pub start: String,
    pub end: String,
    pub comparison: Option<ComparisonView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub interactive: bool,
    pub message: &'a str,
    pub status: u16,
}

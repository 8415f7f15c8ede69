//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_adapter;
pub mod dashboard_view;
pub mod file_config_adapter;
pub mod html_report_adapter;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;

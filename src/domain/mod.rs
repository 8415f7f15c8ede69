//! Core domain types and logic.

pub mod aggregate;
pub mod allocation;
pub mod config_validation;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod price;
pub mod price_cache;
pub mod price_table;
pub mod ranking;
pub mod returns;
pub mod settings;
pub mod universe;

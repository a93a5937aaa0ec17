//! Unit-Economics Analyzer Library
//!
//! Turns Ozon unit-economics CSV exports into per-SKU and grand-total
//! ledgers, then derives cost breakdown, tax, profit and margin metrics.
//!
//! This library provides tools for:
//! - Locating the real table header behind a report's preamble
//! - Lenient parsing of locale-formatted currency cells
//! - Grouping cost columns into logistics, returns, services and promotion
//! - Aggregating rows per product key in first-seen order
//! - Deriving cross-docking, subscription allocation, tax and profit

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod constants;
pub mod currency;
pub mod decoder;
pub mod error;
pub mod header;
pub mod metrics;
pub mod models;
pub mod render;
pub mod report;

pub use config::{BusinessRules, ReportColumns, ReportConfig};
pub use currency::parse_currency;
pub use error::{ReportError, Result};
pub use metrics::{Metrics, MetricsEngine, ProductMetrics};
pub use models::{AnalysisResult, Ledger, LineItem, ProductKey, ProductLedger};
pub use report::{parse_report, parse_report_from_reader, parse_report_text};

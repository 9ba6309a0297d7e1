//! Rendered documents

pub mod report;

pub use report::{InventoryReport, ReportError, ReportRenderer, ReportRow};

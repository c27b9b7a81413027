//! pmccabe report parsing and schema definitions.
//!
//! This module handles:
//! - Splitting raw pmccabe lines into typed records
//! - Decomposing record paths into package/file levels
//! - Tracked attribute definitions
//! - Range specifications used for filtering

pub mod range;
pub mod record;
pub mod schema;

// Re-export main types
pub use range::MetricRange;
pub use record::{parse_report, strip_line_suffix, Record, RecordLocation};
pub use schema::{parse_metric_list, Metric, MetricTuple};

//! pmccabe invocation over a source tree.

pub mod pmccabe;

pub use pmccabe::{collect_sources, PmccabeRunner, SourceFilter};

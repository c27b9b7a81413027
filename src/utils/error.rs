//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while splitting a single pmccabe record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least 7 fields, found {found}")]
    TooFewFields { found: usize },

    #[error("field `{field}` is not a number: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Errors that can occur while parsing a report or a range specification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("Invalid range `{spec}`: {reason}")]
    InvalidRange { spec: String, reason: String },
}

/// Errors caused by an invalid attribute selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Attribute `{0}` is not supported. Available attributes are: mmcc,tmcc,sif,lif")]
    UnsupportedAttribute(String),

    #[error("At least one attribute must be selected")]
    NoAttributes,
}

/// Errors raised by tree lookups and invariant checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Entry with id {0} is not unique")]
    DuplicateId(u64),

    #[error("Entry with id {0} does not exist")]
    NotFound(u64),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while scanning sources with pmccabe
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source path does not exist: {0}")]
    SourceNotFound(String),

    #[error("No source files matched under {0}")]
    NoSources(String),

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pmccabe produced output that is not valid UTF-8")]
    InvalidOutput,
}

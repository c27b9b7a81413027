//! pmccabe record parsing.
//!
//! A pmccabe report holds one function per line:
//!
//! ```text
//! 7  8  10  40  20  src/net/socket.cpp(40): Socket::connect
//! ```
//!
//! i.e. modified McCabe, traditional McCabe, statements, first line,
//! lines in function, `path(line):` and the function signature.

use super::schema::MetricTuple;
use crate::utils::config::RECORD_FIELD_COUNT;
use crate::utils::error::{ParseError, RecordError};
use log::{debug, warn};
use std::str::FromStr;

/// One parsed pmccabe line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub mmcc: u64,
    pub tmcc: u64,
    pub sif: u64,
    pub flf: u64,
    pub lif: u64,
    /// Undivided `path(line):` field
    pub path: String,
    pub signature: String,
}

/// A record path split into tree levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation<'a> {
    /// Directory levels from the outermost package down, `(...)` suffixes removed
    pub packages: Vec<&'a str>,
    /// Source file name without the line suffix
    pub file_name: &'a str,
    /// Everything after the first `(` of the file segment, e.g. `42):`
    pub line_suffix: Option<&'a str>,
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < RECORD_FIELD_COUNT {
            return Err(RecordError::TooFewFields { found: fields.len() });
        }

        Ok(Record {
            mmcc: parse_count("mmcc", fields[0])?,
            tmcc: parse_count("tmcc", fields[1])?,
            sif: parse_count("sif", fields[2])?,
            flf: parse_count("flf", fields[3])?,
            lif: parse_count("lif", fields[4])?,
            path: fields[5].to_string(),
            // Signatures such as `operator ==` span several fields
            signature: fields[6..].join(" "),
        })
    }
}

impl Record {
    /// Blank lines carry no record and are skipped by callers
    pub fn is_blank(line: &str) -> bool {
        line.split_whitespace().next().is_none()
    }

    /// Values tracked by the aggregation maps
    pub fn metrics(&self) -> MetricTuple {
        MetricTuple::new(self.mmcc, self.tmcc, self.sif, self.lif)
    }

    /// Path with the `(line):` suffix removed
    pub fn source_path(&self) -> &str {
        strip_line_suffix(&self.path)
    }

    /// Decompose the path into package levels and the file segment
    ///
    /// Empty segments (leading or doubled separators) and `.` segments are
    /// dropped. A path with no usable segment is treated as a bare file.
    pub fn location(&self, separator: char) -> RecordLocation<'_> {
        let mut segments: Vec<&str> = self
            .path
            .split(separator)
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        let file_segment = segments.pop().unwrap_or(self.path.as_str());
        let (file_name, line_suffix) = match file_segment.split_once('(') {
            Some((name, suffix)) => (name, Some(suffix)),
            None => (file_segment, None),
        };

        RecordLocation {
            packages: segments.into_iter().map(strip_line_suffix).collect(),
            file_name,
            line_suffix,
        }
    }

    /// Key identifying the function inside its file
    ///
    /// The line suffix keeps overloads and same-named functions apart.
    pub fn function_identity(&self, separator: char) -> String {
        match self.location(separator).line_suffix {
            Some(suffix) => format!("{}({}", self.signature, suffix),
            None => self.signature.clone(),
        }
    }
}

/// Parse a full pmccabe report, skipping blank lines
///
/// **Public** - main entry point for report parsing
///
/// # Errors
/// * `ParseError::MalformedRecord` - first line that is not a valid record,
///   with its 1-based line number
pub fn parse_report(text: &str) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if Record::is_blank(line) {
            continue;
        }
        let record = line
            .parse::<Record>()
            .map_err(|source| ParseError::MalformedRecord {
                line: index + 1,
                source,
            })?;
        records.push(record);
    }

    if records.is_empty() {
        warn!("Report contains no records");
    } else {
        debug!("Parsed {} records", records.len());
    }

    Ok(records)
}

/// Drop everything from the first `(` on
pub fn strip_line_suffix(segment: &str) -> &str {
    segment.split('(').next().unwrap_or(segment)
}

fn parse_count(field: &'static str, value: &str) -> Result<u64, RecordError> {
    value.parse::<u64>().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

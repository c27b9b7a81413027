//! Inclusive numeric ranges given as `min,max` on the command line.

use crate::utils::error::ParseError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive range, open on any side whose bound is `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl MetricRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Lower bound only
    pub fn at_least(min: u64) -> Self {
        Self::new(Some(min), None)
    }

    /// Both bounds, inclusive
    pub fn between(min: u64, max: u64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl FromStr for MetricRange {
    type Err = ParseError;

    /// `"4,15"` is `[4, 15]`, `"4"` and `"4,"` are `[4, ∞)`.
    /// A token that is not purely decimal leaves that side unbounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() > 2 {
            return Err(ParseError::InvalidRange {
                spec: s.to_string(),
                reason: format!("expected 1 or 2 comma-separated values, found {}", parts.len()),
            });
        }

        let min = parse_bound(parts[0]);
        let max = parts.get(1).and_then(|token| parse_bound(token));
        Ok(Self { min, max })
    }
}

impl fmt::Display for MetricRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "[{}, {}]", min, max),
            (Some(min), None) => write!(f, "[{}, ∞)", min),
            (None, Some(max)) => write!(f, "(-∞, {}]", max),
            (None, None) => f.write_str("(-∞, ∞)"),
        }
    }
}

fn parse_bound(token: &str) -> Option<u64> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

//! Tracked complexity attributes and their fixed-order tuple.
//!
//! Every aggregate in the tree (child statistics, mean, median,
//! deviation) is a `MetricTuple` ordered mmcc, tmcc, sif, lif.

use crate::utils::error::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A complexity attribute that can be filtered on and collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Modified McCabe cyclomatic complexity
    Mmcc,
    /// Traditional McCabe cyclomatic complexity
    Tmcc,
    /// Statements in function
    Sif,
    /// Lines in function
    Lif,
}

impl Metric {
    /// All tracked attributes in tuple order
    pub const ALL: [Metric; 4] = [Metric::Mmcc, Metric::Tmcc, Metric::Sif, Metric::Lif];

    /// Lowercase attribute name as used on the command line and in markup
    pub fn name(self) -> &'static str {
        match self {
            Metric::Mmcc => "mmcc",
            Metric::Tmcc => "tmcc",
            Metric::Sif => "sif",
            Metric::Lif => "lif",
        }
    }

    /// Tag prepended to the weight when several attributes share one stack dump
    pub fn tag(self) -> String {
        format!("<<{}>>", self.name().to_ascii_uppercase())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mmcc" => Ok(Metric::Mmcc),
            "tmcc" => Ok(Metric::Tmcc),
            "sif" => Ok(Metric::Sif),
            "lif" => Ok(Metric::Lif),
            _ => Err(ConfigError::UnsupportedAttribute(s.to_string())),
        }
    }
}

/// One value per tracked attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricTuple {
    pub mmcc: u64,
    pub tmcc: u64,
    pub sif: u64,
    pub lif: u64,
}

impl MetricTuple {
    pub fn new(mmcc: u64, tmcc: u64, sif: u64, lif: u64) -> Self {
        Self { mmcc, tmcc, sif, lif }
    }

    /// Build a tuple by evaluating `f` for every attribute
    pub fn from_fn(mut f: impl FnMut(Metric) -> u64) -> Self {
        Self::new(
            f(Metric::Mmcc),
            f(Metric::Tmcc),
            f(Metric::Sif),
            f(Metric::Lif),
        )
    }

    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Mmcc => self.mmcc,
            Metric::Tmcc => self.tmcc,
            Metric::Sif => self.sif,
            Metric::Lif => self.lif,
        }
    }
}

impl fmt::Display for MetricTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.mmcc, self.tmcc, self.sif, self.lif)
    }
}

/// Parse a comma-separated attribute list such as `mmcc,sif`
pub fn parse_metric_list(list: &str) -> Result<Vec<Metric>, ConfigError> {
    let mut metrics = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let metric: Metric = name.parse()?;
        if !metrics.contains(&metric) {
            metrics.push(metric);
        }
    }

    if metrics.is_empty() {
        return Err(ConfigError::NoAttributes);
    }
    Ok(metrics)
}

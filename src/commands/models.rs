use crate::aggregator::{CollapseConfig, RangeFilter};
use crate::output::MarkupConfig;
use crate::scanner::SourceFilter;
use crate::utils::config::DEFAULT_PMCCABE_PROGRAM;
use clap::ValueEnum;
use std::path::PathBuf;

/// Where the raw pmccabe report comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Report piped into the process
    #[default]
    Stdin,

    /// Report saved to a file
    File(PathBuf),

    /// Run pmccabe over a source tree
    Scan {
        root: PathBuf,
        filter: SourceFilter,
        program: String,
    },
}

impl InputSource {
    /// Scan `root` with the default filter and program
    pub fn scan(root: impl Into<PathBuf>) -> Self {
        InputSource::Scan {
            root: root.into(),
            filter: SourceFilter::default(),
            program: DEFAULT_PMCCABE_PROGRAM.to_string(),
        }
    }
}

/// When the statistics pass runs relative to the range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatsOrder {
    /// No statistics
    #[default]
    None,

    /// Aggregate the unfiltered population, then filter
    BeforeFilter,

    /// Filter first, aggregate the surviving leaves
    AfterFilter,
}

/// Output format of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeFormat {
    #[default]
    Xml,
    Json,
}

/// Arguments for the build command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub input: InputSource,

    /// Leaves outside these ranges are dropped
    pub filter: RangeFilter,

    pub stats: StatsOrder,

    pub format: TreeFormat,

    pub markup: MarkupConfig,

    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
}

/// Arguments for the collapse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct CollapseArgs {
    pub input: InputSource,

    /// Leaves outside these ranges are dropped before collapsing
    pub filter: RangeFilter,

    pub collapse: CollapseConfig,

    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
}

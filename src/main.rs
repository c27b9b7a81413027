//! pmccabe-tree CLI
//!
//! Builds package trees and flamegraph-ready collapsed stacks from
//! pmccabe complexity reports.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pmccabe_tree::aggregator::{CollapseConfig, RangeFilter};
use pmccabe_tree::commands::{
    build, collapse, display_attributes, display_version, BuildArgs, CollapseArgs, InputSource,
    StatsOrder, TreeFormat,
};
use pmccabe_tree::output::MarkupConfig;
use pmccabe_tree::parser::{parse_metric_list, Metric, MetricRange};
use pmccabe_tree::scanner::SourceFilter;
use pmccabe_tree::utils::config::{
    attributes_help, DEFAULT_EXCLUDED_FRAGMENTS, DEFAULT_PMCCABE_PROGRAM,
    DEFAULT_SOURCE_EXTENSIONS,
};

/// pmccabe-tree - complexity trees and flamegraph stacks from pmccabe
#[derive(Parser, Debug)]
#[command(name = "pmccabe-tree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the package tree and print it as markup
    #[command(after_help = attributes_help())]
    Build {
        #[command(flatten)]
        input: InputOpts,

        #[command(flatten)]
        ranges: RangeOpts,

        /// Whether and when to compute mean/median/deviation per package
        #[arg(long, value_enum, default_value_t = StatsOrder::None)]
        stats: StatsOrder,

        /// Output format
        #[arg(long, value_enum, default_value_t = TreeFormat::Xml)]
        format: TreeFormat,

        /// Indent the markup document
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collapse the package tree into flamegraph stacks
    #[command(after_help = attributes_help())]
    Collapse {
        #[command(flatten)]
        input: InputOpts,

        #[command(flatten)]
        ranges: RangeOpts,

        /// Attributes used as stack weight, comma separated
        #[arg(short, long = "attr", default_value = "mmcc")]
        attributes: String,

        /// Drop the extension from file frames
        #[arg(long)]
        strip_extension: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Describe the tracked attributes
    Attributes,

    /// Display version information
    Version,
}

/// Where the pmccabe report comes from
#[derive(Args, Debug)]
struct InputOpts {
    /// Read the pmccabe report from a file instead of stdin
    #[arg(short, long, conflicts_with = "source")]
    input: Option<PathBuf>,

    /// Run pmccabe over the sources under this path
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// pmccabe executable used with --source
    #[arg(long, env = "PMCCABE_BIN", default_value = DEFAULT_PMCCABE_PROGRAM)]
    pmccabe: String,

    /// Source extensions scanned with --source
    #[arg(long = "ext", value_delimiter = ',', default_values_t = to_strings(DEFAULT_SOURCE_EXTENSIONS))]
    extensions: Vec<String>,

    /// Path fragments skipped with --source
    #[arg(long = "exclude", value_delimiter = ',', default_values_t = to_strings(DEFAULT_EXCLUDED_FRAGMENTS))]
    excluded: Vec<String>,
}

/// Inclusive MIN[,MAX] ranges; functions outside any of them are dropped
#[derive(Args, Debug)]
struct RangeOpts {
    /// Modified McCabe complexity range
    #[arg(long, value_name = "MIN[,MAX]")]
    mmcc: Option<MetricRange>,

    /// Traditional McCabe complexity range
    #[arg(long, value_name = "MIN[,MAX]")]
    tmcc: Option<MetricRange>,

    /// Statement count range
    #[arg(long, value_name = "MIN[,MAX]")]
    sif: Option<MetricRange>,

    /// Line count range
    #[arg(long, value_name = "MIN[,MAX]")]
    lif: Option<MetricRange>,
}

impl InputOpts {
    fn into_source(self) -> InputSource {
        match (self.input, self.source) {
            (Some(path), _) => InputSource::File(path),
            (None, Some(root)) => InputSource::Scan {
                root,
                filter: SourceFilter {
                    extensions: self.extensions,
                    excluded: self.excluded,
                },
                program: self.pmccabe,
            },
            (None, None) => InputSource::Stdin,
        }
    }
}

impl RangeOpts {
    fn into_filter(self) -> RangeFilter {
        let mut filter = RangeFilter::new();
        filter.set(Metric::Mmcc, self.mmcc);
        filter.set(Metric::Tmcc, self.tmcc);
        filter.set(Metric::Sif, self.sif);
        filter.set(Metric::Lif, self.lif);
        filter
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Build {
            input,
            ranges,
            stats,
            format,
            pretty,
            output,
        } => {
            let args = BuildArgs {
                input: input.into_source(),
                filter: ranges.into_filter(),
                stats,
                format,
                markup: MarkupConfig { pretty },
                output,
            };

            // Validate args first
            build::validate_args(&args)?;

            build::execute_build(args)?;
        }

        Commands::Collapse {
            input,
            ranges,
            attributes,
            strip_extension,
            output,
        } => {
            // Unknown attribute names fail here, before any input is read
            let metrics = parse_metric_list(&attributes)?;

            let args = CollapseArgs {
                input: input.into_source(),
                filter: ranges.into_filter(),
                collapse: CollapseConfig::new(metrics).with_strip_extension(strip_extension),
                output,
            };

            collapse::validate_args(&args)?;

            collapse::execute_collapse(args)?;
        }

        Commands::Attributes => {
            display_attributes();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}


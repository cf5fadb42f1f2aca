use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentimap")]
#[command(about = "Comment sentiment and emotion analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve labels for comment batches and report statistics
    Analyze {
        /// Comment files to analyze, one comment per line; each file is one batch
        #[arg(required = true)]
        comments: Vec<PathBuf>,

        /// JSON Lines file with pre-computed classifier verdicts
        #[arg(long, env = "SENTIMAP_VERDICTS")]
        verdicts: PathBuf,

        /// Platform the comments came from (e.g. youtube, reddit)
        #[arg(short, long)]
        platform: String,

        /// Locator recorded in the history (defaults to the comment file path)
        #[arg(long)]
        locator: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Axis to look up in the latest analysis (sentiment or emotion)
        #[arg(long = "filter-axis", requires = "filter_label")]
        filter_axis: Option<String>,

        /// Label to look up on the filter axis
        #[arg(long = "filter-label", requires = "filter_axis")]
        filter_label: Option<String>,

        /// Maximum number of comments returned by the lookup
        #[arg(long, default_value = "5", allow_negative_numbers = true)]
        limit: i64,

        /// Number of history entries to show (defaults to the configured limit)
        #[arg(long)]
        history: Option<usize>,

        /// Configuration file (defaults to searching for .sentimap.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Classify comments sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show analysis lifecycle
        /// -vv: Show rule matches
        /// -vvv: Show everything
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a sentimap configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

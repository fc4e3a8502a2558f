use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

/// Collect article headlines from news feeds into a timestamped text corpus.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// RON configuration file (defaults to ./headline.ron when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the titles file, overriding the configuration
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep titles files from earlier runs instead of deleting them
    #[arg(long)]
    pub keep_previous: bool,

    /// Where log records go
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the built-in configuration as RON and exit
    #[arg(long)]
    pub print_default_config: bool,
}

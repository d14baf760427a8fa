use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eagrab")]
#[command(about = "Fast CLI tool for finding and downloading Electricity Authority datasets")]
#[command(version)]
pub struct Cli {
    /// Defaults to the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List blobs matching a query, e.g. `Datasets/Wholesale -sd 2023-01-01 -ed 2023-12-31`
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Path prefix with optional -sd/-ed dates (options go before the query)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Download every blob matching a query
    Download {
        /// Output directory (defaults to EAGRAB_DOWNLOAD_DIR or ./downloads)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Path prefix with optional -sd/-ed dates (options go before the query)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Interactive menu
    Menu {
        /// Starting output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Rebuild the raw query string from its shell words.
    pub fn join_query(words: &[String]) -> String {
        words.join(" ")
    }
}

use clap::{Parser, Subcommand};
use posterforged_common::KindFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "posterforged")]
#[command(author, version, about = "Poster and backdrop aggregation engine")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all configured providers and their availability
    Providers,

    /// Run one query against a provider and print the first page
    Fetch {
        /// Provider key (e.g. amzn, zee5, nf, tmdb)
        #[arg(short, long, required = true)]
        provider: String,

        /// Page URL, title id, or search text for the provider
        #[arg(required = true)]
        input: String,

        /// Orientation filter: landscape, portrait, or both
        #[arg(short, long, default_value = "both")]
        kind: KindFilter,

        /// Language tag filter (e.g. Tamil)
        #[arg(short, long)]
        language: Option<String>,

        /// Jump to this page (1-based) after fetching
        #[arg(long)]
        page: Option<usize>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "posterforge")]
#[command(author, version, about = "Catalog enrichment: posters and trailers from TMDB")]
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
    /// Replace placeholder poster images for eligible records
    Posters {
        /// TMDB API key (falls back to the TMDB_API_KEY env var)
        api_key: Option<String>,

        /// Input content file (falls back to the usual locations)
        input: Option<PathBuf>,
    },

    /// Update posters and trailers for every record
    All {
        /// TMDB API key (falls back to the TMDB_API_KEY env var)
        api_key: Option<String>,

        /// Input content file (falls back to the usual locations)
        input: Option<PathBuf>,
    },

    /// List record fragments and their enrichment eligibility (offline)
    Scan {
        /// Input content file (falls back to the usual locations)
        input: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

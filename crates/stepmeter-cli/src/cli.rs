//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stepmeter_types::OutputFormat;

#[derive(Parser)]
#[command(name = "stepmeter")]
#[command(version)]
#[command(about = "Track electricity meter readings against a seasonal step allowance")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Override the data directory (default: platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// First-run setup: season allowance and API credential
    Init {
        /// Step allowance for the season, in kWh
        #[arg(long)]
        steps: f64,

        /// API key for the vision endpoint (can also be set later)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },

    /// Extract a reading from a meter photo and append it to the ledger
    Capture {
        /// Path to the meter photo
        image: PathBuf,

        /// Skip the extraction cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Show the season dashboard
    Status,

    /// List recorded readings, newest first
    History {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Show or change settings
    Config {
        /// Show current settings
        #[arg(long)]
        show: bool,

        /// Set the API key
        #[arg(long, value_name = "KEY")]
        set_api_key: Option<String>,

        /// Set the season allowance (recomputes the season limit)
        #[arg(long, value_name = "STEPS")]
        set_steps: Option<f64>,
    },

    /// Write the whole state to a backup file
    Export {
        /// Output file (default: stepmeter_backup_<date>.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace the whole state from a backup file
    Import {
        /// Path to the backup JSON file
        file: PathBuf,

        /// Validate and summarize the backup without importing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the season's reference photo to a JPEG file
    Photo {
        /// Output file (default: stepmeter_reference.jpg)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Delete all local data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage the extraction cache
    Cache {
        /// Clear all cached extractions
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },
}

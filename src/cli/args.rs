use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "sst-processor")]
#[command(about = "District-heating substation export processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE, help = "Settings file (TOML)")]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the unified 15-minute table from raw sensor exports
    Build {
        #[arg(short, long, help = "Directory of raw ';'-delimited exports")]
        input_dir: Option<PathBuf>,

        #[arg(short, long, help = "Output Parquet file path")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Directory for excluded-file and duplicate-column logs")]
        log_dir: Option<PathBuf>,

        #[arg(short, long, help = "snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(long, help = "Skip the outside temperature fetch")]
        no_weather: bool,
    },

    /// Write collector configuration exports for the CAD points
    ExportConfig {
        #[arg(long, help = "CAD transmission points (CSV with U_NO_EGID)")]
        cad_points: PathBuf,

        #[arg(long, help = "Techant master list (CSV)")]
        techant: PathBuf,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "motionlive")]
#[command(about = "Convert motion-photo pairs into Apple Live Photos", long_about = None)]
pub struct Cli {
    /// Directory containing motion-photo stills and their companion videos
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Number of parallel conversion workers (default: half the CPU cores, max 4)
    #[arg(long, short = 'w', value_name = "N")]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that ffmpeg, exiftool and the makelive injector are installed
    CheckTools,

    /// Scan a directory and list pairs without converting
    Scan {
        /// Directory to scan (defaults to current directory)
        directory: Option<PathBuf>,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}

//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "multitrack-audio")]
#[command(about = "Unlimited BGM/BGS/ME/SE channels driven by text commands", long_about = None)]
pub struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the audio root directory from the config
    #[arg(long, value_name = "DIR")]
    pub audio_root: Option<PathBuf>,

    /// Record backend calls instead of opening an audio device
    #[arg(long)]
    pub silent: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

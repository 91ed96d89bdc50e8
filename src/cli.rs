use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tubefetch::client::{Format, Quality};

#[derive(Parser, Debug)]
#[command(name = "tubefetch")]
#[command(about = "Submit videos to a download service and follow their progress", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $TUBEFETCH_CONFIG or config/tubefetch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a video and follow the task until it finishes
    Download(DownloadArgs),
    /// Show preview metadata for a video URL
    Info(InfoArgs),
    /// Check the state of an existing task once
    Status(StatusArgs),
    /// Probe the download service
    Health,
    /// Show or switch the colour theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Video URL
    pub url: String,

    /// Output format: mp3 or mp4
    #[arg(long, short)]
    pub format: Option<Format>,

    /// Video quality for mp4: 360, 480, 720, 1080 or best
    #[arg(long, short)]
    pub quality: Option<Quality>,

    /// Save the finished file into this directory
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Skip the preview lookup
    #[arg(long)]
    pub no_preview: bool,
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Video URL
    pub url: String,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Task identifier returned on submission
    pub task_id: String,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

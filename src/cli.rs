use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipforge")]
#[command(author, version, about = "Preview normalization and playlist building on top of ffmpeg")]
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
    /// Normalize a clip into a high-def and a low-def MP4
    Normalize {
        /// Clip to normalize
        #[arg(required = true)]
        input: PathBuf,

        /// Output frame rate (config default if not specified)
        #[arg(long)]
        fps: Option<u32>,

        /// High-def output height (config default if not specified)
        #[arg(long)]
        height: Option<u32>,

        /// High-def output width (derived from the aspect ratio if not specified)
        #[arg(long)]
        width: Option<u32>,
    },

    /// Concatenate clips into one movie
    Playlist {
        /// Clips to concatenate, in playback order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output movie
        #[arg(short, long)]
        output: PathBuf,

        /// Output frame rate (config default if not specified)
        #[arg(long)]
        fps: Option<u32>,

        /// Output height (config default; ignored when --width is not given)
        #[arg(long)]
        height: Option<u32>,

        /// Output width (the first clip's size is used if not specified)
        #[arg(long)]
        width: Option<u32>,

        /// Always re-encode instead of trying a stream copy first
        #[arg(long)]
        full: bool,
    },

    /// Probe a media file and display its streams
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a job described by a JSON payload file
    Job {
        /// Kind of job
        #[arg(value_enum)]
        kind: JobKind,

        /// Payload file
        payload: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobKind {
    Normalize,
    Playlist,
}

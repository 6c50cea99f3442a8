use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::render::AspectRatio;

#[derive(Parser)]
#[command(
    name = "clipper",
    about = "Social Clipper - Turn long-form videos into short, captioned social-media clips",
    version,
    long_about = "A CLI tool that transcribes a video, asks a language model for engaging segments, and renders the selected ranges as standalone clips with burned-in captions using ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe a video and propose engaging clip ranges
    Analyze {
        /// YouTube URL or local video file to analyze
        #[arg(value_name = "URL_OR_FILE")]
        input: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Where to save the transcript JSON (consumed later by `clip --captions`)
        #[arg(short, long, value_name = "FILE")]
        transcript: Option<PathBuf>,
    },

    /// Cut one clip from a video, optionally burning in captions
    Clip {
        /// YouTube URL or local video file to clip
        #[arg(value_name = "URL_OR_FILE")]
        input: String,

        /// Clip start in seconds
        #[arg(short, long, value_name = "SECONDS")]
        start: f64,

        /// Clip end in seconds
        #[arg(short, long, value_name = "SECONDS")]
        end: f64,

        /// Target aspect ratio
        #[arg(short, long, value_enum, default_value = "16:9")]
        aspect_ratio: AspectRatio,

        /// Transcript JSON file to burn in as captions
        #[arg(short, long, value_name = "FILE")]
        captions: Option<PathBuf>,

        /// Caption font size in points
        #[arg(long, value_name = "POINTS")]
        font_size: Option<u32>,

        /// Caption text color as #RRGGBB
        #[arg(long, value_name = "HEX")]
        font_color: Option<String>,

        /// Caption background box color as #RRGGBB
        #[arg(long, value_name = "HEX")]
        bg_color: Option<String>,

        /// Caption background opacity, 0.0 to 1.0
        #[arg(long, value_name = "OPACITY")]
        bg_opacity: Option<f64>,

        /// Upload the finished clip to the configured storage sink
        #[arg(short, long)]
        upload: bool,
    },

    /// Configure the remote provider and render settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List supported video sources
    Sources,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Human-readable candidate table
    Table,
    /// JSON with candidates and transcript
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

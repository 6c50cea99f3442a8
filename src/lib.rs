//! Social Clipper - A Rust CLI tool for turning long-form videos into short clips
//!
//! This library provides functionality to transcribe a video, ask a language model
//! for engaging segments, and render the selected ranges as standalone clips with
//! burned-in captions using ffmpeg.

pub mod acquire;
pub mod analyze;
pub mod captions;
pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod style;
pub mod transcribe;
pub mod transcript;
pub mod utils;

pub use analyze::ClipCandidate;
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{AnalysisReport, ClipOutcome, ClipRequest, ClipperPipeline};
pub use render::AspectRatio;
pub use transcript::TranscriptSegment;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the clipper
#[derive(thiserror::Error, Debug)]
pub enum ClipperError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Video acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Segment proposal failed: {0}")]
    ProposalFailed(String),

    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),
}

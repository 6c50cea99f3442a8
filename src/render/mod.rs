use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::style::{resolve_style, CaptionStyle};
use crate::{ClipperError, Result};

/// Target aspect ratio for the rendered clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9 landscape (source framing, no crop)
    #[value(name = "16:9")]
    Wide,
    /// 9:16 portrait (TikTok/Reels)
    #[value(name = "9:16")]
    Portrait,
    /// 1:1 square
    #[value(name = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Wide => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single stage of the ffmpeg video filter chain
#[derive(Debug, Clone)]
pub enum VideoFilter {
    /// Center-crop the frame to a target aspect ratio
    Crop(AspectRatio),

    /// Burn a subtitle file into the frame with an ASS force_style
    BurnSubtitles {
        srt_path: PathBuf,
        force_style: String,
    },
}

impl VideoFilter {
    /// Render this stage as an ffmpeg filter expression
    ///
    /// Returns `None` for stages that are no-ops (a 16:9 crop of 16:9 source).
    fn to_expression(&self) -> Option<String> {
        match self {
            VideoFilter::Crop(AspectRatio::Wide) => None,
            VideoFilter::Crop(AspectRatio::Portrait) => Some("crop=ih*(9/16):ih".to_string()),
            VideoFilter::Crop(AspectRatio::Square) => Some("crop=ih:ih".to_string()),
            VideoFilter::BurnSubtitles {
                srt_path,
                force_style,
            } => {
                // The subtitles filter uses ':' as its field separator, so
                // literal colons in the path must be escaped.
                let escaped_path = srt_path.to_string_lossy().replace(':', "\\:");
                Some(format!(
                    "subtitles='{}':force_style='{}'",
                    escaped_path, force_style
                ))
            }
        }
    }
}

/// An ordered video filter chain, joined into a single `-vf` argument
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<VideoFilter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: VideoFilter) {
        self.filters.push(filter);
    }

    /// Join all non-empty stages into one comma-separated `-vf` value
    pub fn to_arg(&self) -> Option<String> {
        let expressions: Vec<String> = self
            .filters
            .iter()
            .filter_map(|f| f.to_expression())
            .collect();

        if expressions.is_empty() {
            None
        } else {
            Some(expressions.join(","))
        }
    }
}

/// A request to cut one clip out of a source video
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Source video file
    pub input_path: PathBuf,

    /// Clip start, seconds from the beginning of the source
    pub start_time: f64,

    /// Clip end, seconds from the beginning of the source
    pub end_time: f64,

    /// Output framing
    pub aspect_ratio: AspectRatio,

    /// Optional subtitle file to burn in (already re-timed to the clip)
    pub subtitle_path: Option<PathBuf>,

    /// Caption styling, resolved against the aspect ratio
    pub style: CaptionStyle,
}

impl RenderRequest {
    /// Clip length in seconds; zero or negative duration is a caller error
    pub fn duration(&self) -> Result<f64> {
        let duration = self.end_time - self.start_time;
        if duration <= 0.0 {
            return Err(ClipperError::InvalidRequest(format!(
                "end_time ({}) must be after start_time ({})",
                self.end_time, self.start_time
            ))
            .into());
        }
        Ok(duration)
    }

    /// Build the filter chain for this request
    pub fn filter_chain(&self) -> FilterChain {
        let mut chain = FilterChain::new();
        chain.push(VideoFilter::Crop(self.aspect_ratio));

        if let Some(srt_path) = &self.subtitle_path {
            chain.push(VideoFilter::BurnSubtitles {
                srt_path: srt_path.clone(),
                force_style: resolve_style(&self.style, self.aspect_ratio),
            });
        }

        chain
    }
}

/// Result of a successful render
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub output_path: PathBuf,
}

/// Cut, crop, and caption one clip with a single ffmpeg invocation
///
/// Seeks to the request's start time, reads for its duration, applies the
/// composed filter chain, and re-encodes with libx264/aac, overwriting any
/// existing file at `output_path`. A non-zero ffmpeg exit is fatal for this
/// render; the captured stderr is attached to the error. Temporary subtitle
/// files are the caller's to clean up.
pub async fn render_clip(request: &RenderRequest, output_path: &Path) -> Result<RenderResult> {
    let duration = request.duration()?;
    let filter_arg = request.filter_chain().to_arg();

    tracing::info!(
        "Rendering clip {} -> {} ({}s, {})",
        request.input_path.display(),
        output_path.display(),
        duration,
        request.aspect_ratio
    );

    let mut command = Command::new("ffmpeg");
    command
        .arg("-y")
        .args(["-ss", &request.start_time.to_string()])
        .args(["-t", &duration.to_string()])
        .arg("-i")
        .arg(&request.input_path);

    if let Some(vf) = &filter_arg {
        command.args(["-vf", vf]);
    }

    command
        .args(["-c:v", "libx264"])
        .args(["-c:a", "aac"])
        .arg(output_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = command.output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipperError::RenderFailed(format!(
            "ffmpeg exited with {}: {}",
            output.status, stderr
        ))
        .into());
    }

    Ok(RenderResult {
        output_path: output_path.to_path_buf(),
    })
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{ClipperError, Result};

pub mod local;
pub mod youtube;

/// A source video resolved to a local file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceVideo {
    /// Local path to the video file
    pub path: PathBuf,

    /// Duration in seconds if known
    pub duration: Option<f64>,

    /// Title of the media if known
    pub title: Option<String>,
}

/// Trait for resolving different video inputs into local files
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch the input into `download_dir`, returning the local file
    async fn fetch(&self, input: &str, download_dir: &Path) -> Result<SourceVideo>;

    /// Check if this source handles the given input
    fn supports(&self, input: &str) -> bool;

    /// Get the name of this source
    fn name(&self) -> &'static str;
}

/// Registry for managing multiple video sources
pub struct SourceRegistry {
    sources: Vec<Box<dyn MediaSource>>,
}

impl SourceRegistry {
    /// Create a new registry with default sources
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        registry.register(Box::new(youtube::YoutubeSource::new()));
        registry.register(Box::new(local::LocalFileSource::new()));

        registry
    }

    /// Register a new source
    pub fn register(&mut self, source: Box<dyn MediaSource>) {
        self.sources.push(source);
    }

    /// Find the source that handles the given input
    pub fn find_source(&self, input: &str) -> Option<&dyn MediaSource> {
        self.sources
            .iter()
            .find(|source| source.supports(input))
            .map(|boxed| boxed.as_ref())
    }

    /// List all registered source names
    pub fn list_sources(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Fetch the input using the appropriate source
    pub async fn fetch(&self, input: &str, download_dir: &Path) -> Result<SourceVideo> {
        let source = self
            .find_source(input)
            .ok_or_else(|| ClipperError::UnsupportedInput(input.to_string()))?;

        tracing::info!("Fetching input via {} source: {}", source.name(), input);
        source.fetch(input, download_dir).await
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe a local video file with ffprobe
///
/// Returns the container duration and fails if the file has no video stream.
pub(crate) async fn probe_video(path: &Path) -> Result<Option<f64>> {
    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipperError::AcquisitionFailed(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            stderr
        ))
        .into());
    }

    let info: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    let duration = info["format"]["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok());

    let empty_vec = vec![];
    let streams = info["streams"].as_array().unwrap_or(&empty_vec);
    let has_video = streams
        .iter()
        .any(|stream| stream["codec_type"].as_str() == Some("video"));

    if !has_video {
        return Err(ClipperError::AcquisitionFailed(format!(
            "file does not contain a video stream: {}",
            path.display()
        ))
        .into());
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_routes_youtube_urls() {
        let registry = SourceRegistry::new();

        let source = registry
            .find_source("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(source.name(), "YouTube");

        let source = registry.find_source("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(source.name(), "YouTube");
    }

    #[test]
    fn test_registry_rejects_unknown_urls() {
        let registry = SourceRegistry::new();
        assert!(registry.find_source("https://example.com/video").is_none());
    }

    #[test]
    fn test_registry_lists_sources() {
        let registry = SourceRegistry::new();
        let names = registry.list_sources();
        assert!(names.contains(&"YouTube"));
        assert!(names.contains(&"Local File"));
    }
}

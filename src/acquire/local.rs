use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

use super::{probe_video, MediaSource, SourceVideo};
use crate::Result;

/// Local video file source
///
/// Validates the file with ffprobe instead of downloading anything; the file
/// is used in place, never copied into the download directory.
pub struct LocalFileSource;

impl LocalFileSource {
    pub fn new() -> Self {
        Self
    }

    /// Check if the file exists and is accessible
    async fn validate_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            anyhow::bail!("File does not exist: {}", path.display());
        }

        if !path.is_file() {
            anyhow::bail!("Path is not a file: {}", path.display());
        }

        match fs::metadata(path).await {
            Ok(metadata) => {
                if metadata.len() == 0 {
                    anyhow::bail!("File is empty: {}", path.display());
                }
            }
            Err(e) => {
                anyhow::bail!("Cannot access file {}: {}", path.display(), e);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl MediaSource for LocalFileSource {
    async fn fetch(&self, input: &str, _download_dir: &Path) -> Result<SourceVideo> {
        let file_path = Path::new(input);

        self.validate_file(file_path).await?;
        let duration = probe_video(file_path).await?;

        let title = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());

        let absolute_path = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.to_path_buf());

        Ok(SourceVideo {
            path: absolute_path,
            duration,
            title,
        })
    }

    fn supports(&self, input: &str) -> bool {
        // Clearly a URL, not ours
        if input.starts_with("http://") || input.starts_with("https://") {
            return false;
        }

        let path = Path::new(input);
        if path.exists() {
            return true;
        }

        // Looks like a file path even if it doesn't exist yet
        let has_extension = path.extension().is_some();
        let has_path_separators = input.contains('/') || input.contains('\\');
        let starts_with_dot = input.starts_with("./") || input.starts_with(".\\");

        has_extension || has_path_separators || starts_with_dot
    }

    fn name(&self) -> &'static str {
        "Local File"
    }
}

impl Default for LocalFileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_file_like_inputs() {
        let source = LocalFileSource::new();
        assert!(source.supports("./video.mp4"));
        assert!(source.supports("/tmp/recording.mkv"));
        assert!(!source.supports("https://youtube.com/watch?v=abc"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let source = LocalFileSource::new();
        let result = source
            .fetch("/nonexistent/video.mp4", Path::new("/tmp"))
            .await;
        assert!(result.is_err());
    }
}

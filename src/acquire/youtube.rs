use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use url::Url;

use super::{MediaSource, SourceVideo};
use crate::Result;

/// YouTube video source using yt-dlp
pub struct YoutubeSource {
    yt_dlp_path: String,
}

impl YoutubeSource {
    pub fn new() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(output.map(|o| o.status.success()).unwrap_or(false))
    }

    /// Get video information using yt-dlp
    async fn get_video_info(&self, url: &str) -> Result<Value> {
        tracing::debug!("Extracting video info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error);
        }

        let json_str = String::from_utf8(output.stdout)?;
        let info: Value = serde_json::from_str(&json_str)?;

        Ok(info)
    }

    /// Download the video as mp4 into the download directory
    async fn download_video(&self, url: &str, output_path: &Path) -> Result<()> {
        tracing::debug!("Downloading video to: {}", output_path.display());

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--format",
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
                "--output",
                &output_path.to_string_lossy(),
                "--no-playlist",
                "--quiet",
                "--no-warnings",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to download video: {}", error);
        }

        Ok(())
    }
}

/// Extract the video id from a YouTube URL
///
/// Handles `watch?v=`, `youtu.be/`, and `embed/` forms. Returns `None` for
/// anything that doesn't carry an id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let parsed = Url::parse(input).ok()?;
    let host = parsed.host_str()?;

    if host.ends_with("youtu.be") {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string());
    }

    if host.ends_with("youtube.com") {
        if parsed.path() == "/watch" {
            return parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.to_string());
        }

        let mut segments = parsed.path_segments()?;
        if matches!(segments.next(), Some("embed") | Some("v")) {
            return segments
                .next()
                .filter(|id| !id.is_empty())
                .map(|id| id.to_string());
        }
    }

    None
}

#[async_trait]
impl MediaSource for YoutubeSource {
    async fn fetch(&self, input: &str, download_dir: &Path) -> Result<SourceVideo> {
        if !self.check_availability().await? {
            anyhow::bail!("yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp");
        }

        let video_id = extract_video_id(input)
            .ok_or_else(|| anyhow::anyhow!("Could not extract video id from URL: {}", input))?;

        fs_err::create_dir_all(download_dir)?;
        let output_path = download_dir.join(format!("{}.mp4", video_id));

        let info = self.get_video_info(input).await?;
        let title = info["title"].as_str().map(|s| s.to_string());
        let duration = info["duration"].as_f64();

        // Reuse a previous download of the same video
        if output_path.exists() {
            tracing::info!("Using cached download: {}", output_path.display());
        } else {
            self.download_video(input, &output_path).await?;
        }

        Ok(SourceVideo {
            path: output_path,
            duration,
            title,
        })
    }

    fn supports(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        input_lower.contains("youtube.com/watch")
            || input_lower.contains("youtu.be/")
            || input_lower.contains("youtube.com/embed/")
            || input_lower.contains("youtube.com/v/")
            || input_lower.contains("m.youtube.com/")
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_rejects_other_urls() {
        assert_eq!(extract_video_id("https://example.com/watch?v=abc"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }
}

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::transcript::TranscriptSegment;
use crate::{ClipperError, Result};

/// Compress audio with ffmpeg to fit remote API upload limits
///
/// Converts to 16 kHz mono mp3 at 32k bitrate and strips video. The output
/// lands in `output_dir` as `{stem}_compressed.mp3`, overwriting any previous
/// run. A non-zero ffmpeg exit is fatal to the analysis call.
pub async fn compress_audio(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let output_path = output_dir.join(format!("{}_compressed.mp3", stem));

    tracing::info!(
        "Compressing audio {} -> {}",
        input_path.display(),
        output_path.display()
    );

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input_path)
        .args(["-ar", "16000"])
        .args(["-ac", "1"])
        .arg("-vn")
        .args(["-c:a", "libmp3lame"])
        .args(["-b:a", "32k"])
        .arg("-y")
        .arg(&output_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipperError::TranscriptionFailed(format!(
            "ffmpeg audio compression exited with {}: {}",
            output.status, stderr
        ))
        .into());
    }

    Ok(output_path)
}

/// Whisper `verbose_json` response shape
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    text: String,
    start: f64,
    end: f64,
}

/// Client for a Whisper-compatible remote transcription endpoint
pub struct TranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl TranscriptionClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Transcribe an audio file, returning normalized transcript segments
    pub async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let content = fs_err::read(audio_path).context("Failed to read compressed audio")?;

        tracing::info!(
            "Transcribing {} ({} bytes) with model {}",
            file_name,
            content.len(),
            self.model
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(content).file_name(file_name),
            )
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ClipperError::TranscriptionFailed(format!(
                "transcription endpoint returned HTTP {}: {}",
                status, detail
            ))
            .into());
        }

        let transcription: VerboseTranscription = response.json().await?;
        Ok(normalize_segments(transcription.segments))
    }
}

/// Normalize Whisper `{start, end, text}` segments to `{text, start, duration}`
fn normalize_segments(segments: Vec<WhisperSegment>) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .map(|segment| TranscriptSegment {
            text: segment.text.trim().to_string(),
            start: segment.start,
            duration: segment.end - segment.start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_text_and_derives_duration() {
        let segments = vec![
            WhisperSegment {
                text: " hello there ".to_string(),
                start: 0.0,
                end: 2.5,
            },
            WhisperSegment {
                text: "second".to_string(),
                start: 2.5,
                end: 4.0,
            },
        ];

        let normalized = normalize_segments(segments);
        assert_eq!(normalized[0].text, "hello there");
        assert_eq!(normalized[0].duration, 2.5);
        assert_eq!(normalized[1].start, 2.5);
        assert_eq!(normalized[1].duration, 1.5);
    }

    #[test]
    fn test_verbose_json_parses_without_segments() {
        let parsed: VerboseTranscription = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert!(parsed.segments.is_empty());
    }
}

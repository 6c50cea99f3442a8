use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

use crate::acquire::SourceRegistry;
use crate::analyze::{collect_candidates, ClipCandidate, ProposalClient};
use crate::captions::generate_srt;
use crate::config::Config;
use crate::render::{render_clip, AspectRatio, RenderRequest};
use crate::storage::StorageSink;
use crate::style::CaptionStyle;
use crate::transcribe::{compress_audio, TranscriptionClient};
use crate::transcript::{chunk_segments, TranscriptSegment};
use crate::utils::sanitize_filename;

/// Result of analyzing a source video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Model-proposed clip candidates, in chunk order
    pub candidates: Vec<ClipCandidate>,

    /// Full transcript of the source
    pub transcript: Vec<TranscriptSegment>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

/// Metadata about the analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Title of the source media if known
    pub source_title: Option<String>,

    /// Duration of the source in seconds if known
    pub source_duration: Option<f64>,

    /// Total transcript chunks
    pub chunk_count: usize,

    /// Chunks actually submitted for analysis (bounded by config)
    pub analyzed_chunks: usize,

    /// Timestamp when the analysis completed
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// A request to cut one clip from a source video
#[derive(Debug, Clone)]
pub struct ClipRequest {
    /// Source video: YouTube URL or local file path
    pub input: String,

    /// Clip start in seconds
    pub start_time: f64,

    /// Clip end in seconds
    pub end_time: f64,

    /// Output framing
    pub aspect_ratio: AspectRatio,

    /// Captions to burn in, with absolute source timestamps
    pub captions: Option<Vec<TranscriptSegment>>,

    /// Caption styling
    pub style: CaptionStyle,

    /// Upload the finished clip to the configured storage sink
    pub upload: bool,
}

/// Outcome of a clip request
#[derive(Debug, Clone)]
pub struct ClipOutcome {
    /// Local path of the finished clip
    pub path: PathBuf,

    /// Public URL if the clip was uploaded
    pub url: Option<String>,

    /// True when an existing output file was reused without rendering
    pub reused: bool,
}

/// Main clipping pipeline
pub struct ClipperPipeline {
    config: Config,
    source_registry: SourceRegistry,
    storage: Option<StorageSink>,
    temp_dir: TempDir,
}

impl ClipperPipeline {
    /// Create a new pipeline
    pub async fn new(config: Config) -> Result<Self> {
        let storage = match &config.storage {
            Some(storage_config) => match StorageSink::connect(storage_config).await {
                Ok(sink) => Some(sink),
                Err(e) => {
                    tracing::warn!("Storage sink unavailable, uploads disabled: {:#}", e);
                    None
                }
            },
            None => None,
        };

        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;

        Ok(Self {
            config,
            source_registry: SourceRegistry::new(),
            storage,
            temp_dir,
        })
    }

    /// Analyze a source video: transcribe it and propose clip candidates
    ///
    /// A missing API key fails the whole call; per-chunk proposal failures
    /// degrade to fewer candidates.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisReport> {
        let api_key = self.config.llm_api_key()?;

        let source = self
            .source_registry
            .fetch(input, &self.config.render.download_dir)
            .await?;

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );

        progress.set_message("Compressing audio...");
        let audio_path = compress_audio(&source.path, self.temp_dir.path()).await?;

        progress.set_message("Transcribing audio...");
        let transcription_client = TranscriptionClient::new(
            &self.config.llm.base_url,
            &api_key,
            &self.config.llm.transcription_model,
        );
        let transcript = transcription_client.transcribe(&audio_path).await?;
        tracing::info!("Transcript has {} segments", transcript.len());

        let chunks: Vec<String> =
            chunk_segments(&transcript, self.config.analysis.chunk_budget).collect();
        let chunk_count = chunks.len();
        let analyzed_chunks = chunk_count.min(self.config.analysis.max_chunks);

        progress.set_message(format!(
            "Analyzing {} of {} chunks...",
            analyzed_chunks, chunk_count
        ));
        let proposal_client = ProposalClient::new(
            &self.config.llm.base_url,
            &api_key,
            &self.config.llm.model,
            self.config.llm.temperature,
        );
        let candidates = collect_candidates(
            &proposal_client,
            chunks.into_iter(),
            self.config.analysis.max_chunks,
        )
        .await;

        progress.finish_with_message(format!("Found {} clip candidates", candidates.len()));

        Ok(AnalysisReport {
            candidates,
            transcript,
            metadata: AnalysisMetadata {
                source_title: source.title,
                source_duration: source.duration,
                chunk_count,
                analyzed_chunks,
                completed_at: chrono::Utc::now(),
            },
        })
    }

    /// Cut one clip, burning captions in when supplied
    ///
    /// The output path is deterministic per (source, start, end); if the file
    /// already exists it is returned untouched.
    pub async fn create_clip(&self, request: ClipRequest) -> Result<ClipOutcome> {
        let source = self
            .source_registry
            .fetch(&request.input, &self.config.render.download_dir)
            .await?;

        fs_err::create_dir_all(&self.config.render.clips_dir)?;

        let stem = source
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("clip");
        let clip_filename = format!(
            "{}_{}_{}.mp4",
            sanitize_filename(stem),
            request.start_time,
            request.end_time
        );
        let output_path = self.config.render.clips_dir.join(&clip_filename);

        if output_path.exists() {
            tracing::info!("Clip already produced: {}", output_path.display());
            return Ok(ClipOutcome {
                path: output_path,
                url: None,
                reused: true,
            });
        }

        // The temporary subtitle file is scoped to this request; the render
        // itself never cleans up caption files.
        let subtitle_path = match &request.captions {
            Some(captions) => {
                let srt_content = generate_srt(captions, request.start_time);
                let srt_path = self
                    .temp_dir
                    .path()
                    .join(format!("temp_{}.srt", Uuid::new_v4()));
                fs_err::write(&srt_path, srt_content)?;
                Some(srt_path)
            }
            None => None,
        };

        let render_request = RenderRequest {
            input_path: source.path.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            aspect_ratio: request.aspect_ratio,
            subtitle_path: subtitle_path.clone(),
            style: request.style,
        };

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.set_message("Rendering clip with ffmpeg...");

        let render_result = render_clip(&render_request, &output_path).await;

        if let Some(srt_path) = &subtitle_path {
            if let Err(e) = fs_err::remove_file(srt_path) {
                tracing::debug!("Could not remove temporary subtitle file: {}", e);
            }
        }

        let rendered = match render_result {
            Ok(rendered) => rendered,
            Err(e) => {
                progress.finish_with_message("Render failed");
                // ffmpeg can leave a partial file behind on failure
                if output_path.exists() {
                    let _ = fs_err::remove_file(&output_path);
                }
                return Err(e);
            }
        };
        progress.finish_with_message("Render complete");

        if !self.config.render.keep_source
            && source.path.starts_with(&self.config.render.download_dir)
        {
            if let Err(e) = fs_err::remove_file(&source.path) {
                tracing::warn!("Could not remove downloaded source: {}", e);
            }
        }

        let url = if request.upload {
            self.upload_clip(&rendered.output_path, &clip_filename).await
        } else {
            None
        };

        Ok(ClipOutcome {
            path: rendered.output_path,
            url,
            reused: false,
        })
    }

    /// Best-effort upload; a failure falls back to the local path
    async fn upload_clip(&self, path: &std::path::Path, file_name: &str) -> Option<String> {
        let sink = match &self.storage {
            Some(sink) => sink,
            None => {
                tracing::warn!("Upload requested but no storage sink is configured");
                return None;
            }
        };

        match sink.upload(path, file_name).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Upload failed, serving local path instead: {:#}", e);
                None
            }
        }
    }
}

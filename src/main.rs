use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_clipper::acquire::SourceRegistry;
use social_clipper::cli::{Cli, Commands};
use social_clipper::config::Config;
use social_clipper::pipeline::{ClipRequest, ClipperPipeline};
use social_clipper::style::CaptionStyle;
use social_clipper::transcript::TranscriptSegment;
use social_clipper::utils;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_clipper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Check for required external dependencies (non-fatal in Docker)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    let config = Config::load().await?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            transcript,
        } => {
            let pipeline = ClipperPipeline::new(config).await?;

            tracing::info!("Starting analysis for: {}", input);
            let report = pipeline.analyze(&input).await?;

            match &output {
                Some(path) => {
                    social_clipper::output::save_to_file(&report, path, &format).await?;
                    println!("Analysis saved to: {}", path.display());
                }
                None => {
                    social_clipper::output::print_to_console(&report, &format)?;
                }
            }

            // Keep the transcript around so `clip --captions` can use it
            let transcript_path = transcript.or_else(|| {
                output
                    .as_ref()
                    .map(|path| path.with_extension("transcript.json"))
            });
            if let Some(path) = transcript_path {
                social_clipper::output::save_transcript(&report, &path).await?;
                println!("Transcript saved to: {}", path.display());
            }
        }
        Commands::Clip {
            input,
            start,
            end,
            aspect_ratio,
            captions,
            font_size,
            font_color,
            bg_color,
            bg_opacity,
            upload,
        } => {
            let caption_track = match captions {
                Some(path) => {
                    let content =
                        fs_err::read_to_string(&path).context("Failed to read captions file")?;
                    let segments: Vec<TranscriptSegment> =
                        serde_json::from_str(&content).context("Failed to parse captions JSON")?;
                    Some(segments)
                }
                None => None,
            };

            let pipeline = ClipperPipeline::new(config).await?;

            tracing::info!("Creating clip {}s-{}s from: {}", start, end, input);
            let outcome = pipeline
                .create_clip(ClipRequest {
                    input,
                    start_time: start,
                    end_time: end,
                    aspect_ratio,
                    captions: caption_track,
                    style: CaptionStyle {
                        font_size,
                        font_color,
                        bg_color,
                        bg_opacity,
                    },
                    upload,
                })
                .await?;

            if outcome.reused {
                println!("Clip already exists: {}", outcome.path.display());
            } else {
                println!("Clip saved to: {}", outcome.path.display());
            }
            if let Some(url) = outcome.url {
                println!("Uploaded to: {}", url);
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
        Commands::Sources => {
            let registry = SourceRegistry::new();
            println!("Supported video sources:");
            for name in registry.list_sources() {
                println!("  • {}", name);
            }
            println!("  • More sources coming soon!");
        }
    }

    Ok(())
}

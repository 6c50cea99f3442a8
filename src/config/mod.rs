use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ClipperError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote LLM / speech-to-text provider settings
    pub llm: LlmConfig,

    /// Transcript analysis settings
    pub analysis: AnalysisConfig,

    /// Clip rendering settings
    pub render: RenderConfig,

    /// Optional S3 upload sink
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; falls back to the GROQ_API_KEY environment variable
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Chat model used for segment proposals
    pub model: String,

    /// Speech-to-text model used for transcription
    pub transcription_model: String,

    /// Sampling temperature for proposals
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Character budget per transcript chunk
    pub chunk_budget: usize,

    /// Number of chunks submitted for analysis; later chunks are skipped
    pub max_chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory for finished clips
    pub clips_dir: PathBuf,

    /// Directory for downloaded source videos
    pub download_dir: PathBuf,

    /// Keep downloaded source videos after clipping
    pub keep_source: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// S3 bucket for uploaded clips
    pub bucket: String,

    /// AWS region
    pub region: String,

    /// Optional key prefix
    pub key_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "openai/gpt-oss-120b".to_string(),
                transcription_model: "whisper-large-v3".to_string(),
                temperature: 0.5,
            },
            analysis: AnalysisConfig {
                chunk_budget: 5000,
                max_chunks: 3,
            },
            render: RenderConfig {
                clips_dir: PathBuf::from("clips"),
                download_dir: PathBuf::from("downloads"),
                keep_source: true,
            },
            storage: None,
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("social-clipper").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.analysis.chunk_budget == 0 {
            anyhow::bail!("analysis.chunk_budget must be greater than zero");
        }

        if self.analysis.max_chunks == 0 {
            anyhow::bail!("analysis.max_chunks must be greater than zero");
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!("llm.temperature must be between 0.0 and 2.0");
        }

        if let Some(storage) = &self.storage {
            if storage.bucket.is_empty() {
                anyhow::bail!("storage.bucket must not be empty when storage is configured");
            }
        }

        Ok(())
    }

    /// Resolve the LLM API key, falling back to the environment
    ///
    /// A missing key is a fatal configuration error for any operation that
    /// talks to the remote provider.
    pub fn llm_api_key(&self) -> Result<String> {
        self.llm
            .api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClipperError::MissingCredential("GROQ_API_KEY").into())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  LLM Base URL: {}", self.llm.base_url);
        println!("  Proposal Model: {}", self.llm.model);
        println!("  Transcription Model: {}", self.llm.transcription_model);
        println!("  Temperature: {}", self.llm.temperature);
        println!("  Chunk Budget: {} chars", self.analysis.chunk_budget);
        println!("  Max Chunks: {}", self.analysis.max_chunks);
        println!("  Clips Dir: {}", self.render.clips_dir.display());
        println!("  Download Dir: {}", self.render.download_dir.display());
        println!("  Keep Source: {}", self.render.keep_source);
        match &self.storage {
            Some(storage) => {
                println!("  S3 Bucket: {} ({})", storage.bucket, storage.region);
                if let Some(prefix) = &storage.key_prefix {
                    println!("  S3 Prefix: {}", prefix);
                }
            }
            None => println!("  Storage: not configured"),
        }
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_budget_is_rejected() {
        let mut config = Config::default();
        config.analysis.chunk_budget = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_storage_bucket_is_rejected() {
        let mut config = Config::default();
        config.storage = Some(StorageConfig {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            key_prefix: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.analysis.max_chunks, config.analysis.max_chunks);
    }
}

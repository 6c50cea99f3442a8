use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ClipCandidate, ProposeSegments};
use crate::{ClipperError, Result};

/// System instruction sent with every proposal request
const SYSTEM_PROMPT: &str = r#"
You are an expert video editor. Your task is to analyze a transcript from a YouTube video and identify 3-5 engaging, self-contained segments suitable for short-form content (TikTok/Reels).
Each segment must be between 20 and 60 seconds long.
You must output strictly raw JSON with no markdown formatting.
The JSON structure must be:
{
  "clips": [
    {
      "start_time": "MM:SS",
      "end_time": "MM:SS",
      "title": "Catchy Title",
      "reason": "Why this segment is engaging"
    }
  ]
}
"#;

/// Top-level shape of the model's JSON answer
///
/// The response is untrusted; a missing `clips` key collapses to an empty
/// list rather than an error.
#[derive(Debug, Deserialize)]
struct ProposalResponse {
    #[serde(default)]
    clips: Vec<ClipCandidate>,
}

/// Shape of an OpenAI-style chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Segment-proposal client for an OpenAI-compatible chat completions endpoint
///
/// Constructed per analysis call from configuration; holds no process-wide
/// state.
pub struct ProposalClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl ProposalClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Parse the message content the model returned into candidates
    fn parse_content(content: &str) -> Result<Vec<ClipCandidate>> {
        let response: ProposalResponse = serde_json::from_str(content).map_err(|e| {
            ClipperError::ProposalFailed(format!("model returned non-JSON content: {}", e))
        })?;

        Ok(response.clips)
    }
}

#[async_trait]
impl ProposeSegments for ProposalClient {
    async fn propose(&self, chunk: &str) -> Result<Vec<ClipCandidate>> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": format!("Analyze this transcript:\n\n{}", chunk)},
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ClipperError::ProposalFailed(format!(
                "proposal endpoint returned HTTP {}: {}",
                status, detail
            ))
            .into());
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();

        if content.is_empty() {
            return Ok(Vec::new());
        }

        Self::parse_content(content)
    }
}

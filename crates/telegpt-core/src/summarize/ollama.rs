use super::Summarizer;
use crate::SummarizeError;
use crate::http::default_agent;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const MODEL: &str = "gemma3:12b";
const TEMPERATURE: f64 = 0.01;

/// Local Ollama inference server, non-streaming `/api/generate`.
pub struct OllamaSummarizer {
    model: String,
    base_url: String,
    agent: ureq::Agent,
}

impl OllamaSummarizer {
    pub fn new() -> Self {
        let base_url = std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self {
            model: MODEL.to_string(),
            base_url,
            agent: default_agent(),
        }
    }

    fn parse_response(body: &str) -> Result<String, SummarizeError> {
        let response: OllamaResponse =
            serde_json::from_str(body).map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;
        Ok(response.response)
    }
}

impl Default for OllamaSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn summarize(&self, system: &str, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "system": system,
            "stream": false,
            "options": { "temperature": TEMPERATURE },
        });

        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| SummarizeError::Network(format!("{e}")))?;

        let raw = response
            .into_body()
            .read_to_string()
            .map_err(|e| SummarizeError::Network(format!("{e}")))?;

        Self::parse_response(raw.trim())
    }
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

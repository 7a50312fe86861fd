use super::{NO_RESPONSE, Summarizer, post_json};
use crate::SummarizeError;
use crate::http::default_agent;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.01;

/// OpenAI chat completions.
pub struct OpenAiSummarizer {
    model: String,
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String) -> Self {
        Self {
            model: MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            agent: default_agent(),
        }
    }

    fn build_request_body(&self, system: &str, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
            "stream": false,
        })
    }

    fn parse_response(body: &str) -> Result<String, SummarizeError> {
        let response: ChatCompletionsResponse =
            serde_json::from_str(body).map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SummarizeError::InvalidResponse("no choices".into()))?;
        Ok(choice.message.content)
    }
}

impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn summarize(&self, system: &str, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(system, prompt);
        let auth = format!("Bearer {}", self.api_key);

        match post_json(&self.agent, &url, ("Authorization", &auth), body)? {
            Some(raw) => Self::parse_response(&raw),
            None => Ok(NO_RESPONSE.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatCompletionsChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionsChoice {
    message: ChatCompletionsMessage,
}

#[derive(Deserialize)]
struct ChatCompletionsMessage {
    content: String,
}

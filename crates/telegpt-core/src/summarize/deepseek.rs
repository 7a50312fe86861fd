use super::{NO_RESPONSE, Summarizer, post_json};
use crate::SummarizeError;
use crate::http::agent_with_global_timeout;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
const MODEL: &str = "deepseek-reasoner";

// Reasoning models think for a while before the first byte arrives.
const TIMEOUT: Duration = Duration::from_secs(300);

/// DeepSeek chat completions.
pub struct DeepSeekSummarizer {
    model: String,
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl DeepSeekSummarizer {
    pub fn new(api_key: String) -> Self {
        Self {
            model: MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            agent: agent_with_global_timeout(TIMEOUT),
        }
    }

    fn build_request_body(&self, system: &str, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
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

impl Summarizer for DeepSeekSummarizer {
    fn name(&self) -> &'static str {
        "deepseek"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::default_agent;
    use crate::summarize::testutil::one_shot_server;

    fn provider(base_url: String) -> DeepSeekSummarizer {
        DeepSeekSummarizer {
            model: "test-model".to_string(),
            base_url,
            api_key: "test-key".to_string(),
            agent: default_agent(),
        }
    }

    #[test]
    fn empty_success_body_yields_no_response_sentinel() {
        let base_url = one_shot_server("HTTP/1.1 200 OK", "");
        let out = provider(base_url).summarize("s", "p").unwrap();
        assert_eq!(out, NO_RESPONSE);
    }

    #[test]
    fn non_success_status_propagates_as_network_error() {
        let base_url = one_shot_server("HTTP/1.1 500 Internal Server Error", "");
        let err = provider(base_url).summarize("s", "p").unwrap_err();
        assert!(matches!(err, SummarizeError::Network(_)));
    }

    #[test]
    fn success_body_parses_first_completion() {
        let base_url = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"the summary"}}]}"#,
        );
        let out = provider(base_url).summarize("s", "p").unwrap();
        assert_eq!(out, "the summary");
    }

    #[test]
    fn parse_response_rejects_malformed_schema() {
        assert!(DeepSeekSummarizer::parse_response(r#"{"unexpected":true}"#).is_err());
    }

    #[test]
    fn build_request_body_omits_sampling_overrides() {
        let body = provider("http://example.com".into()).build_request_body("s", "p");
        assert!(body.get("temperature").is_none());
        assert_eq!(body["model"], "test-model");
    }
}

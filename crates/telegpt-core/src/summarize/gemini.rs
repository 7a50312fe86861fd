use super::{NO_RESPONSE, Summarizer, post_json};
use crate::SummarizeError;
use crate::http::default_agent;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f64 = 0.01;
const MAX_OUTPUT_TOKENS: u32 = 16384;

// Chat transcripts routinely trip the default filters; summarizing them
// requires all four categories unblocked.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Google Gemini over the REST `generateContent` endpoint.
pub struct GeminiSummarizer {
    model: String,
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl GeminiSummarizer {
    pub fn new(api_key: String) -> Self {
        Self {
            model: MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            agent: default_agent(),
        }
    }

    fn build_request_body(&self, system: &str, prompt: &str) -> serde_json::Value {
        let safety_settings: Vec<serde_json::Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_NONE"}))
            .collect();

        json!({
            "systemInstruction": { "parts": [{"text": system}] },
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]},
            ],
            "safetySettings": safety_settings,
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        })
    }

    fn parse_response(body: &str) -> Result<String, SummarizeError> {
        let response: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SummarizeError::InvalidResponse("no candidates".into()))?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        Ok(text)
    }
}

impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn summarize(&self, system: &str, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_request_body(system, prompt);

        match post_json(&self.agent, &url, ("x-goog-api-key", &self.api_key), body)? {
            Some(raw) => Self::parse_response(&raw),
            None => Ok(NO_RESPONSE.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::default_agent;
    use crate::summarize::testutil::one_shot_server;

    fn provider(base_url: String) -> GeminiSummarizer {
        GeminiSummarizer {
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
        let base_url = one_shot_server("HTTP/1.1 429 Too Many Requests", "");
        let err = provider(base_url).summarize("s", "p").unwrap_err();
        assert!(matches!(err, SummarizeError::Network(_)));
    }

    #[test]
    fn parse_response_concatenates_candidate_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"a "},{"text":"b"}],"role":"model"}}]}"#;
        assert_eq!(GeminiSummarizer::parse_response(body).unwrap(), "a b");
    }

    #[test]
    fn parse_response_without_candidates_is_invalid() {
        assert!(GeminiSummarizer::parse_response(r#"{"candidates":[]}"#).is_err());
    }

    #[test]
    fn build_request_body_unblocks_every_safety_category() {
        let body = provider("http://example.com".into()).build_request_body("sys", "user");
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        for setting in settings {
            assert_eq!(setting["threshold"], "BLOCK_NONE");
        }
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 16384);
    }
}

mod deepseek;
mod gemini;
mod null;
mod ollama;
mod openai;

pub use deepseek::DeepSeekSummarizer;
pub use gemini::GeminiSummarizer;
pub use null::NullSummarizer;
pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;

use crate::SummarizeError;

/// Literal returned when a hosted backend answers 2xx with an empty body.
pub const NO_RESPONSE: &str = "no response";

/// Uniform capability over text-generation backends. One call per run,
/// blocking, no retries.
pub trait Summarizer {
    fn name(&self) -> &'static str;
    fn summarize(&self, system: &str, prompt: &str) -> Result<String, SummarizeError>;
}

/// Env variable holding the API key for `provider`, when it needs one.
pub fn api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" => Some("GEMINI_API_KEY"),
        "deepseek" => Some("DEEPSEEK_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

pub fn create_summarizer(
    provider: &str,
    api_key: Option<&str>,
) -> Result<Box<dyn Summarizer>, SummarizeError> {
    match provider {
        "null" => Ok(Box::new(NullSummarizer)),
        "ollama" => Ok(Box::new(OllamaSummarizer::new())),
        "gemini" => Ok(Box::new(GeminiSummarizer::new(require_key(
            provider, api_key,
        )?))),
        "deepseek" => Ok(Box::new(DeepSeekSummarizer::new(require_key(
            provider, api_key,
        )?))),
        "openai" => Ok(Box::new(OpenAiSummarizer::new(require_key(
            provider, api_key,
        )?))),
        other => Err(SummarizeError::UnknownProvider(other.to_string())),
    }
}

/// One JSON POST shared by the hosted adapters, blocking, no retries. A
/// success response with an empty body becomes `None` so callers can map it
/// to [`NO_RESPONSE`] instead of a parse error.
fn post_json(
    agent: &ureq::Agent,
    url: &str,
    auth: (&str, &str),
    body: serde_json::Value,
) -> Result<Option<String>, SummarizeError> {
    let response = agent
        .post(url)
        .header(auth.0, auth.1)
        .send_json(body)
        .map_err(|e| SummarizeError::Network(format!("{e}")))?;

    let raw = response
        .into_body()
        .read_to_string()
        .map_err(|e| SummarizeError::Network(format!("{e}")))?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn require_key(provider: &str, api_key: Option<&str>) -> Result<String, SummarizeError> {
    let env = api_key_env(provider).unwrap_or("API key");
    api_key
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(SummarizeError::MissingApiKey(env))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::default_agent;
    use serde_json::json;

    #[test]
    fn keyless_providers_construct_without_a_key() {
        assert!(create_summarizer("null", None).is_ok());
        assert!(create_summarizer("ollama", None).is_ok());
    }

    #[test]
    fn hosted_providers_fail_fast_without_a_key() {
        for provider in ["gemini", "deepseek", "openai"] {
            let err = create_summarizer(provider, None).err().unwrap();
            assert!(matches!(err, SummarizeError::MissingApiKey(_)), "{provider}");
            let err = create_summarizer(provider, Some("  ")).err().unwrap();
            assert!(matches!(err, SummarizeError::MissingApiKey(_)), "{provider}");
        }
    }

    #[test]
    fn hosted_providers_construct_with_a_key() {
        for provider in ["gemini", "deepseek", "openai"] {
            let summarizer = create_summarizer(provider, Some("k")).unwrap();
            assert_eq!(summarizer.name(), provider);
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_summarizer("claude", None).err().unwrap();
        assert!(matches!(err, SummarizeError::UnknownProvider(_)));
    }

    #[test]
    fn post_json_maps_empty_success_body_to_none() {
        let base_url = testutil::one_shot_server("HTTP/1.1 200 OK", "");
        let agent = default_agent();
        let out = post_json(&agent, &base_url, ("Authorization", "Bearer k"), json!({})).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn post_json_trims_whitespace_only_bodies() {
        let base_url = testutil::one_shot_server("HTTP/1.1 200 OK", "  \n ");
        let agent = default_agent();
        let out = post_json(&agent, &base_url, ("Authorization", "Bearer k"), json!({})).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn post_json_propagates_non_success_status() {
        let base_url = testutil::one_shot_server("HTTP/1.1 500 Internal Server Error", "");
        let agent = default_agent();
        let err = post_json(&agent, &base_url, ("Authorization", "Bearer k"), json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, SummarizeError::Network(_)));
    }

    #[test]
    fn api_key_env_names_the_hosted_variables() {
        assert_eq!(api_key_env("gemini"), Some("GEMINI_API_KEY"));
        assert_eq!(api_key_env("deepseek"), Some("DEEPSEEK_API_KEY"));
        assert_eq!(api_key_env("openai"), Some("OPENAI_API_KEY"));
        assert_eq!(api_key_env("null"), None);
        assert_eq!(api_key_env("ollama"), None);
    }
}

use super::Summarizer;
use crate::SummarizeError;

/// Echoes the prompt back. Useful for dry runs and prompt debugging.
pub struct NullSummarizer;

impl Summarizer for NullSummarizer {
    fn name(&self) -> &'static str {
        "null"
    }

    fn summarize(&self, _system: &str, prompt: &str) -> Result<String, SummarizeError> {
        Ok(prompt.to_string())
    }
}

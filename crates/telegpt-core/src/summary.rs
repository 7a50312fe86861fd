//! One-shot orchestration: transcript lines in, summary text out.

use crate::SummaryError;
use crate::prompt;
use crate::summarize;
use std::path::Path;

/// Returned without touching any backend when the day had no eligible
/// messages.
pub const EMPTY_CONVERSATION: &str = "There is no any conversation today in the chat!";

/// Join the transcript, render the prompt template, and run one backend call.
///
/// An empty conversation short-circuits to [`EMPTY_CONVERSATION`] before any
/// prompt file is read or any backend is constructed.
pub fn summarize_conversation(
    provider: &str,
    api_key: Option<&str>,
    prompt_dir: &Path,
    prompt_file: &str,
    conversation: &[String],
) -> Result<String, SummaryError> {
    if conversation.is_empty() {
        return Ok(EMPTY_CONVERSATION.to_string());
    }

    let content = conversation.join("\n");
    let system_text = prompt::load(prompt_dir, prompt::SYSTEM_PROMPT_FILE)?;
    let template = prompt::load(prompt_dir, prompt_file)?;
    let prompt_text = prompt::render(&template, &content);

    let summarizer = summarize::create_summarizer(provider, api_key)?;
    Ok(summarizer.summarize(&system_text, &prompt_text)?)
}

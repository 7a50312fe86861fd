use thiserror::Error;

/// Errors from summarize backends.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("unknown summarizer: {0}")]
    UnknownProvider(String),

    #[error("api key not set: {0}")]
    MissingApiKey(&'static str),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from prompt file loading.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from one summarization run.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use telegpt_core::prompt::DEFAULT_PROMPT_FILE;
use telegpt_core::summarize::api_key_env;
use thiserror::Error;

pub const ENV_APP_ID: &str = "TELEGPT_APP_ID";
pub const ENV_APP_HASH: &str = "TELEGPT_APP_HASH";
pub const ENV_PHONE: &str = "TELEGPT_PHONE";
pub const ENV_CHAT: &str = "TELEGPT_CHAT";
pub const ENV_SUMMARIZER: &str = "TELEGPT_SUMMARIZER";

const SUMMARIZERS: [&str; 5] = ["null", "ollama", "gemini", "deepseek", "openai"];
const DEFAULT_SUMMARIZER: &str = "ollama";
const DEFAULT_SESSION_FILE: &str = "session/telegpt.session";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required value: pass {flag} or set {env}")]
    Missing {
        flag: &'static str,
        env: &'static str,
    },

    #[error("app id must be an integer (got {0})")]
    InvalidAppId(String),

    #[error("date must be YYYY-MM-DD (got {0})")]
    InvalidDate(String),

    #[error("summarizer must be one of null, ollama, gemini, deepseek, openai (got {0})")]
    UnknownSummarizer(String),

    #[error("api key not set: {0}")]
    MissingApiKey(&'static str),
}

#[derive(Parser, Debug)]
#[command(name = "telegpt", version, about = "AI summarizer for Telegram chats")]
pub struct Cli {
    /// Telegram application identifier
    #[arg(long)]
    pub app_id: Option<i32>,

    /// Telegram application hash
    #[arg(long)]
    pub app_hash: Option<String>,

    /// Phone number of the Telegram account
    #[arg(long)]
    pub phone: Option<String>,

    /// Chat name to summarize
    #[arg(long)]
    pub chat: Option<String>,

    /// Chat date, YYYY-MM-DD (default: today in the local timezone)
    #[arg(long)]
    pub date: Option<String>,

    /// Summarizer backend: null, ollama, gemini, deepseek, or openai
    #[arg(long)]
    pub summarizer: Option<String>,

    /// Name of the prompt template inside the prompt directory
    #[arg(long, default_value = DEFAULT_PROMPT_FILE)]
    pub prompt: String,

    /// Directory holding system.txt and the prompt templates
    #[arg(long, value_name = "dir", default_value = "prompt")]
    pub prompt_dir: PathBuf,

    /// Telegram session file
    #[arg(long, value_name = "file", default_value = DEFAULT_SESSION_FILE)]
    pub session: PathBuf,
}

/// Everything one run needs, resolved once from arguments and environment.
/// Nothing downstream reads the environment again (the Ollama base URL
/// excepted).
#[derive(Debug, Clone)]
pub struct Config {
    pub app_id: i32,
    pub app_hash: String,
    pub phone: String,
    pub chat: String,
    pub date: NaiveDate,
    pub summarizer: String,
    pub prompt_file: String,
    pub prompt_dir: PathBuf,
    pub session_file: PathBuf,
    pub api_key: Option<String>,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let app_id = match cli.app_id {
            Some(id) => id,
            None => {
                let raw = require(None, "--app-id", ENV_APP_ID)?;
                raw.parse()
                    .map_err(|_| ConfigError::InvalidAppId(raw.clone()))?
            }
        };
        let app_hash = require(cli.app_hash, "--app-hash", ENV_APP_HASH)?;
        let phone = require(cli.phone, "--phone", ENV_PHONE)?;
        let chat = require(cli.chat, "--chat", ENV_CHAT)?;

        let date = match cli.date {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidDate(raw))?,
            None => Local::now().date_naive(),
        };

        let summarizer = cli
            .summarizer
            .or_else(|| env_override(ENV_SUMMARIZER))
            .unwrap_or_else(|| DEFAULT_SUMMARIZER.to_string());
        if !SUMMARIZERS.contains(&summarizer.as_str()) {
            return Err(ConfigError::UnknownSummarizer(summarizer));
        }

        let api_key = match api_key_env(&summarizer) {
            Some(env) => Some(env_override(env).ok_or(ConfigError::MissingApiKey(env))?),
            None => None,
        };

        Ok(Config {
            app_id,
            app_hash,
            phone,
            chat,
            date,
            summarizer,
            prompt_file: cli.prompt,
            prompt_dir: cli.prompt_dir,
            session_file: cli.session,
            api_key,
        })
    }
}

fn require(
    value: Option<String>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .or_else(|| env_override(env))
        .ok_or(ConfigError::Missing { flag, env })
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

mod config;
mod telegram;

use clap::Parser;
use config::{Cli, Config};
use telegpt_core::summary;
use telegram::Telegram;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = match Config::resolve(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        chat = %config.chat,
        date = %config.date,
        summarizer = %config.summarizer,
        prompt = %config.prompt_file,
        "requesting chat history"
    );

    let telegram = Telegram::new(
        config.session_file.clone(),
        config.app_id,
        config.app_hash.clone(),
        config.phone.clone(),
    );
    let conversation = match telegram.conversation(&config.chat, config.date) {
        Ok(conversation) => conversation,
        Err(err) => {
            eprintln!("telegram error: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!(lines = conversation.len(), "fetched chat history");

    let summary = match summary::summarize_conversation(
        &config.summarizer,
        config.api_key.as_deref(),
        &config.prompt_dir,
        &config.prompt_file,
        &conversation,
    ) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("summarize error: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        chat = %config.chat,
        date = %config.date,
        summarizer = %config.summarizer,
        "TELEGPT summary:\n\n{summary}"
    );
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

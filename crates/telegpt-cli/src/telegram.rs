use chrono::{Local, NaiveDate, TimeZone};
use grammers_client::session::Session;
use grammers_client::types::{Chat, Message};
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use telegpt_core::transcript::{self, ChatMessage, MESSAGE_LIMIT, ReplyIndex, Sender};
use thiserror::Error;

// GetMessages accepts at most 100 ids per call.
const REPLY_BATCH: usize = 100;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("history fetch failed: {0}")]
    Fetch(String),

    #[error("chat not found: {0}")]
    ChatNotFound(String),
}

/// Telegram account client. The async grammers machinery stays inside
/// [`Telegram::conversation`]; callers see one blocking call per run.
pub struct Telegram {
    session_file: PathBuf,
    api_id: i32,
    api_hash: String,
    phone: String,
}

impl Telegram {
    pub fn new(session_file: PathBuf, api_id: i32, api_hash: String, phone: String) -> Self {
        Self {
            session_file,
            api_id,
            api_hash,
            phone,
        }
    }

    /// Fetch one day of the named chat as formatted transcript lines.
    pub fn conversation(
        &self,
        chat_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, TelegramError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.conversation_inner(chat_name, date))
    }

    async fn conversation_inner(
        &self,
        chat_name: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, TelegramError> {
        if let Some(parent) = self.session_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session = Session::load_file_or_create(&self.session_file)?;
        let client = Client::connect(ClientConfig {
            session,
            api_id: self.api_id,
            api_hash: self.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| TelegramError::Connect(e.to_string()))?;

        self.authorize(&client).await?;

        let chat = find_chat(&client, chat_name).await?;
        let messages = fetch_day(&client, &chat, date).await?;
        tracing::debug!(count = messages.len(), "messages on target date");

        let replies = resolve_replies(&client, &chat, &messages).await?;
        Ok(transcript::build_transcript(&messages, date, &replies))
    }

    /// One-time interactive sign-in; afterwards the session file carries the
    /// credentials.
    async fn authorize(&self, client: &Client) -> Result<(), TelegramError> {
        let authorized = client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Auth(e.to_string()))?;
        if authorized {
            return Ok(());
        }

        tracing::info!(phone = %self.phone, "not authorized, requesting login code");
        let token = client
            .request_login_code(&self.phone)
            .await
            .map_err(|e| TelegramError::Auth(e.to_string()))?;

        let code = prompt_line("Enter the code: ")?;
        match client.sign_in(&token, code.trim()).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let password = prompt_line("Enter your 2FA password: ")?;
                client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(|e| TelegramError::Auth(e.to_string()))?;
            }
            Err(e) => return Err(TelegramError::Auth(e.to_string())),
        }

        client.session().save_to_file(&self.session_file)?;
        tracing::info!("signed in, session saved");
        Ok(())
    }
}

/// Scan all dialogs for an exact name match; first match wins.
async fn find_chat(client: &Client, chat_name: &str) -> Result<Chat, TelegramError> {
    let mut dialogs = client.iter_dialogs();
    while let Some(dialog) = dialogs
        .next()
        .await
        .map_err(|e| TelegramError::Fetch(e.to_string()))?
    {
        let chat = dialog.chat();
        tracing::debug!(id = chat.id(), name = chat.name(), "dialog");
        if chat.name() == chat_name {
            return Ok(chat.clone());
        }
    }
    Err(TelegramError::ChatNotFound(chat_name.to_string()))
}

/// Collect the target day's messages in chronological order.
///
/// History arrives newest first, seeded at the end of the target day so the
/// walk starts on the day itself rather than spending the limit on newer
/// history. It keeps the day's messages, stops at the first older one, and
/// reverses. The limit caps total fetch volume for the run.
async fn fetch_day(
    client: &Client,
    chat: &Chat,
    date: NaiveDate,
) -> Result<Vec<ChatMessage>, TelegramError> {
    let mut collected = Vec::new();
    let mut messages = client.iter_messages(chat).limit(MESSAGE_LIMIT);
    if let Some(offset) = day_end_timestamp(date) {
        messages = messages.max_date(offset);
    }
    while let Some(message) = messages
        .next()
        .await
        .map_err(|e| TelegramError::Fetch(e.to_string()))?
    {
        let local_date = message.date().with_timezone(&Local).date_naive();
        if local_date > date {
            continue;
        }
        if local_date < date {
            break;
        }
        collected.push(map_message(&message, local_date));
    }
    collected.reverse();
    Ok(collected)
}

/// Epoch seconds of the first local instant after `date`, for seeding the
/// history walk. `None` when the instant cannot be represented (calendar
/// overflow, or a DST gap swallowing midnight); the date filter in the walk
/// still holds without the seed.
fn day_end_timestamp(date: NaiveDate) -> Option<i32> {
    let midnight = date.succ_opt()?.and_hms_opt(0, 0, 0)?;
    let instant = Local.from_local_datetime(&midnight).earliest()?;
    i32::try_from(instant.timestamp()).ok()
}

/// Resolve the senders of replied-to messages in batched lookups.
async fn resolve_replies(
    client: &Client,
    chat: &Chat,
    messages: &[ChatMessage],
) -> Result<ReplyIndex, TelegramError> {
    let mut ids: Vec<i32> = messages.iter().filter_map(|m| m.reply_to).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut replies = ReplyIndex::default();
    for chunk in ids.chunks(REPLY_BATCH) {
        let originals = client
            .get_messages_by_id(chat, chunk)
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?;
        for (id, original) in chunk.iter().zip(originals) {
            if let Some(original) = original {
                replies.insert(*id, original.sender().as_ref().map(map_sender));
            }
        }
    }
    Ok(replies)
}

fn map_message(message: &Message, local_date: NaiveDate) -> ChatMessage {
    ChatMessage {
        id: message.id(),
        date: local_date,
        text: message.text().to_string(),
        sender: message.sender().as_ref().map(map_sender),
        reply_to: message.reply_to_message_id(),
    }
}

fn map_sender(sender: &Chat) -> Sender {
    // grammers exposes one display name per peer; it rides in first_name and
    // a blank name falls through to the numeric id.
    let name = sender.name().trim().to_string();
    Sender {
        id: sender.id(),
        first_name: (!name.is_empty()).then_some(name),
        last_name: None,
    }
}

fn prompt_line(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::day_end_timestamp;
    use chrono::{Local, NaiveDate, TimeZone, Timelike};

    #[test]
    fn day_end_timestamp_is_the_next_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let ts = day_end_timestamp(date).unwrap();
        let instant = Local.timestamp_opt(i64::from(ts), 0).single().unwrap();
        assert_eq!(instant.date_naive(), date.succ_opt().unwrap());
        assert_eq!(instant.time().num_seconds_from_midnight(), 0);
    }

    #[test]
    fn day_end_timestamp_bounds_the_target_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let ts = i64::from(day_end_timestamp(date).unwrap());

        let on_day = Local
            .from_local_datetime(&date.and_hms_opt(23, 59, 59).unwrap())
            .earliest()
            .unwrap();
        assert!(on_day.timestamp() < ts);

        let day_after = Local
            .from_local_datetime(&date.succ_opt().unwrap().and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap();
        assert!(ts <= day_after.timestamp());
    }

    #[test]
    fn day_end_timestamp_rejects_post_epoch32_dates() {
        let date = NaiveDate::from_ymd_opt(2039, 1, 1).unwrap();
        assert_eq!(day_end_timestamp(date), None);
    }
}

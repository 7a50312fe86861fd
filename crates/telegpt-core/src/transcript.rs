use chrono::NaiveDate;
use std::collections::HashMap;

/// Token embedded in this tool's own output; messages carrying it are
/// excluded so a summary never feeds on an earlier summary.
pub const MARKER: &str = "TELEGPT";

/// Upper bound on messages fetched for one day.
pub const MESSAGE_LIMIT: usize = 2500;

/// Author label when the sender is entirely absent (e.g. anonymous admins).
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Whoever sent a message, as much of them as the chat client exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One fetched message, already localized to a calendar date.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: i32,
    pub date: NaiveDate,
    pub text: String,
    pub sender: Option<Sender>,
    /// Id of the message this one replies to, if any.
    pub reply_to: Option<i32>,
}

/// Senders of replied-to messages, keyed by message id. A present entry with
/// `None` sender means the message resolved but carries no sender info.
#[derive(Debug, Default)]
pub struct ReplyIndex(HashMap<i32, Option<Sender>>);

impl ReplyIndex {
    pub fn insert(&mut self, message_id: i32, sender: Option<Sender>) {
        self.0.insert(message_id, sender);
    }

    /// Author label of a replied-to message, when that message resolved.
    pub fn author_of(&self, message_id: i32) -> Option<String> {
        self.0
            .get(&message_id)
            .map(|sender| author_label(sender.as_ref()))
    }
}

/// Display label for a message author: full name when both parts are set,
/// a single part when only one is, the bare id when the sender has no name,
/// and a fixed fallback when there is no sender at all.
pub fn author_label(sender: Option<&Sender>) -> String {
    let Some(sender) = sender else {
        return UNKNOWN_AUTHOR.to_string();
    };
    match (sender.first_name.as_deref(), sender.last_name.as_deref()) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_string(),
        (None, Some(last)) => last.to_string(),
        (None, None) => sender.id.to_string(),
    }
}

/// One message per line: newlines become single spaces, carriage returns go.
pub fn normalize_text(text: &str) -> String {
    text.replace('\n', " ").replace('\r', "")
}

/// Format one transcript line. Reply-aware: names the original author when
/// the replied-to message resolved, otherwise the message addresses the room.
pub fn format_line(message: &ChatMessage, reply_author: Option<&str>) -> String {
    let author = author_label(message.sender.as_ref());
    let text = normalize_text(&message.text);
    match reply_author {
        Some(original) => format!("\"{author}\" replies to \"{original}\": {text}"),
        None => format!("\"{author}\" says to everyone: {text}"),
    }
}

/// Turn one day's messages into transcript lines.
///
/// `messages` must be in chronological order. Messages without text and
/// messages containing [`MARKER`] are skipped; the first message dated off
/// `target_date` stops the scan entirely, since timestamps never decrease.
pub fn build_transcript(
    messages: &[ChatMessage],
    target_date: NaiveDate,
    replies: &ReplyIndex,
) -> Vec<String> {
    let mut lines = Vec::new();

    for message in messages {
        if message.text.is_empty() {
            continue;
        }
        if message.text.contains(MARKER) {
            continue;
        }
        if message.date != target_date {
            break;
        }

        let reply_author = message
            .reply_to
            .and_then(|original_id| replies.author_of(original_id));
        lines.push(format_line(message, reply_author.as_deref()));
    }

    lines
}

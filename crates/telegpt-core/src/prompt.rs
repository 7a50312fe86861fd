use crate::PromptError;
use std::fs;
use std::path::Path;

/// Fixed system prompt, read alongside the user templates.
pub const SYSTEM_PROMPT_FILE: &str = "system.txt";

/// Template used when the caller does not name one.
pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";

/// Slot in a user template that receives the joined transcript.
pub const CONTENT_SLOT: &str = "{content}";

/// Read a prompt document from `dir`, trimmed of surrounding whitespace.
pub fn load(dir: &Path, name: &str) -> Result<String, PromptError> {
    let content = fs::read_to_string(dir.join(name))?;
    Ok(content.trim().to_string())
}

/// Substitute the transcript into the template's content slot.
pub fn render(template: &str, content: &str) -> String {
    template.replace(CONTENT_SLOT, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_the_content_slot() {
        let rendered = render("Summarize this:\n{content}\nBe brief.", "a\nb");
        assert_eq!(rendered, "Summarize this:\na\nb\nBe brief.");
    }

    #[test]
    fn render_without_slot_returns_template_unchanged() {
        assert_eq!(render("no slot here", "ignored"), "no slot here");
    }

    #[test]
    fn load_trims_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("prompt.txt"), "\n  keep the middle  \n\n").unwrap();
        let loaded = load(dir.path(), "prompt.txt").unwrap();
        assert_eq!(loaded, "keep the middle");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path(), "absent.txt").is_err());
    }
}

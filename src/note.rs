use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::error::{NoteError, Result};

pub const NOTE_EXTENSION: &str = ".md";

/// Characters that may not appear in a note name on any supported platform.
const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

pub type NoteContent = String;

// Note metadata for list display. `title` is the on-disk filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub title: String,
    pub last_edit_time: i64,
}

impl NoteInfo {
    pub fn new(title: impl Into<String>, last_edit_time: i64) -> Self {
        Self {
            title: title.into(),
            last_edit_time,
        }
    }

    pub fn display_title(&self) -> &str {
        display_title(&self.title)
    }
}

// The selected note together with the content read for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedNote {
    #[serde(flatten)]
    pub info: NoteInfo,
    pub content: NoteContent,
}

/// Appends `.md` unless the name already carries it.
pub fn to_file_name(title: &str) -> String {
    if title.ends_with(NOTE_EXTENSION) {
        title.to_string()
    } else {
        format!("{}{}", title, NOTE_EXTENSION)
    }
}

pub fn display_title(title: &str) -> &str {
    title.strip_suffix(NOTE_EXTENSION).unwrap_or(title)
}

pub fn is_note_file(file_name: &str) -> bool {
    file_name.ends_with(NOTE_EXTENSION)
}

/// Rejects names that are blank, contain reserved characters or would
/// resolve outside the notes directory.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || display_title(trimmed).trim().is_empty() {
        return Err(NoteError::invalid(name, "name is empty"));
    }
    if name.chars().any(|c| RESERVED_CHARS.contains(&c)) {
        return Err(NoteError::invalid(name, "name contains reserved characters"));
    }
    if matches!(trimmed, "." | "..") {
        return Err(NoteError::invalid(name, "name is a relative path"));
    }
    Ok(())
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn system_time_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_normalized_once() {
        assert_eq!(to_file_name("draft"), "draft.md");
        assert_eq!(to_file_name("draft.md"), "draft.md");
        assert_eq!(to_file_name("notes.txt"), "notes.txt.md");
    }

    #[test]
    fn display_title_strips_extension() {
        assert_eq!(display_title("draft.md"), "draft");
        assert_eq!(display_title("draft"), "draft");
        assert_eq!(NoteInfo::new("a.md.md", 0).display_title(), "a.md");
    }

    #[test]
    fn validate_rejects_reserved_characters() {
        for name in ["a/b", "a\\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            let err = validate_name(name).unwrap_err();
            assert!(matches!(err, NoteError::InvalidName { .. }), "{}", name);
        }
    }

    #[test]
    fn validate_rejects_blank_and_relative_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(".md").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("Meeting notes 2024-01-01").is_ok());
        assert!(validate_name("draft.md").is_ok());
    }

    #[test]
    fn note_info_serializes_camel_case() {
        let json = serde_json::to_value(NoteInfo::new("a.md", 42)).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "a.md", "lastEditTime": 42 }));
    }

    #[test]
    fn selected_note_flattens_info() {
        let note = SelectedNote {
            info: NoteInfo::new("a.md", 1),
            content: "hi".to_string(),
        };
        let json = serde_json::to_value(note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "a.md", "lastEditTime": 1, "content": "hi" })
        );
    }
}

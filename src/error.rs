use thiserror::Error;

pub type Result<T> = std::result::Result<T, NoteError>;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("note not found: {0}")]
    NotFound(String),

    #[error("note already exists: {0}")]
    Conflict(String),

    #[error("invalid note name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed settings file: {0}")]
    MalformedSettings(#[from] serde_json::Error),
}

impl NoteError {
    pub(crate) fn invalid(name: &str, reason: &'static str) -> Self {
        NoteError::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    /// Expected conditions the UI reports inline. Anything else is an
    /// environment failure and should surface as a generic error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NoteError::NotFound(_) | NoteError::Conflict(_) | NoteError::InvalidName { .. }
        )
    }
}

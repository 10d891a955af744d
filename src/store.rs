use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, WELCOME_NOTE_FILE_NAME};
use crate::error::{NoteError, Result};
use crate::note::{self, NoteContent, NoteInfo};

const WELCOME_NOTE: &str = include_str!("../resources/welcome_note.md");

/// Filesystem-backed note repository. Every note is one `.md` file directly
/// under the root directory; the filename is the note's identity.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root_dir: PathBuf,
    seed_welcome_note: bool,
}

impl NoteStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            seed_welcome_note: config.seed_welcome_note,
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Maps a title to its file, appending `.md` when missing.
    pub fn resolve(&self, title: &str) -> Result<PathBuf> {
        note::validate_name(title)?;
        Ok(self.root_dir.join(note::to_file_name(title)))
    }

    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root_dir).await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<NoteInfo>> {
        self.ensure_root().await?;

        let mut notes: Vec<NoteInfo> = Vec::new();
        let mut entries = fs::read_dir(&self.root_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !note::is_note_file(&file_name) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            notes.push(NoteInfo::new(file_name, modified_millis(&metadata)));
        }

        if notes.is_empty() && self.seed_welcome_note {
            info!("no notes found, creating a welcome note");
            notes.push(self.seed_welcome().await?);
        }

        Ok(notes)
    }

    async fn seed_welcome(&self) -> Result<NoteInfo> {
        let path = self.root_dir.join(WELCOME_NOTE_FILE_NAME);
        fs::write(&path, WELCOME_NOTE).await?;
        let metadata = fs::metadata(&path).await?;
        Ok(NoteInfo::new(WELCOME_NOTE_FILE_NAME, modified_millis(&metadata)))
    }

    pub async fn read(&self, title: &str) -> Result<NoteContent> {
        let path = self.resolve(title)?;
        debug!("reading note from {:?}", path);

        fs::read_to_string(&path)
            .await
            .map_err(|e| not_found_or_io(e, title))
    }

    /// Overwrites (or creates) the note file with `content`.
    pub async fn write(&self, title: &str, content: &str) -> Result<()> {
        let path = self.resolve(title)?;
        self.ensure_root().await?;

        info!("writing note {:?}", path);
        fs::write(&path, content).await?;
        Ok(())
    }

    /// Creates an empty note and returns its normalized filename.
    pub async fn create(&self, filename: &str) -> Result<String> {
        let path = self.resolve(filename)?;
        self.ensure_root().await?;

        let result = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        match result {
            Ok(_) => {
                info!("created note {:?}", path);
                Ok(note::to_file_name(filename))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!("cannot create note, file already exists: {:?}", path);
                Err(NoteError::Conflict(note::to_file_name(filename)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, title: &str) -> Result<()> {
        let path = self.resolve(title)?;

        info!("deleting note {:?}", path);
        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, title))
    }

    pub async fn rename(&self, old_title: &str, new_title: &str) -> Result<()> {
        let old_path = self.resolve(old_title)?;
        let new_path = self.resolve(new_title)?;

        if !fs::try_exists(&old_path).await? {
            warn!("source note does not exist: {:?}", old_path);
            return Err(NoteError::NotFound(note::to_file_name(old_title)));
        }
        if fs::try_exists(&new_path).await? {
            warn!("destination note already exists: {:?}", new_path);
            return Err(NoteError::Conflict(note::to_file_name(new_title)));
        }

        info!("renaming note {:?} -> {:?}", old_path, new_path);
        fs::rename(&old_path, &new_path).await?;
        Ok(())
    }
}

fn modified_millis(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .map(note::system_time_millis)
        .unwrap_or(0)
}

fn not_found_or_io(err: std::io::Error, title: &str) -> NoteError {
    if err.kind() == ErrorKind::NotFound {
        NoteError::NotFound(note::to_file_name(title))
    } else {
        NoteError::Io(err)
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::cache::NoteCache;
use crate::error::Result;
use crate::note;

enum Message {
    Edit { title: String, content: String },
    Renamed { from: String, to: String },
    Deleted { title: String },
}

/// Coalesces editor changes so each note is written at most once per
/// interval. The first edit opens a window; when it closes, the latest
/// content seen for each edited note is saved.
///
/// Renames and deletions made through the saver follow the pending edits:
/// a renamed note's edit is written under its new name, a deleted note's
/// edit is dropped.
pub struct AutoSaver {
    cache: Arc<NoteCache>,
    messages: mpsc::UnboundedSender<Message>,
    task: JoinHandle<()>,
}

impl AutoSaver {
    pub fn spawn(cache: Arc<NoteCache>, interval: Duration) -> Self {
        let (messages, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(Arc::clone(&cache), rx, interval));
        Self {
            cache,
            messages,
            task,
        }
    }

    /// Queues `content` for the currently selected note. Returns false when
    /// nothing is selected.
    pub fn edit(&self, content: impl Into<String>) -> bool {
        match self.cache.selected_title() {
            Some(title) => self.edit_note(title, content),
            None => false,
        }
    }

    pub fn edit_note(&self, title: impl Into<String>, content: impl Into<String>) -> bool {
        let title: String = title.into();
        self.messages
            .send(Message::Edit {
                title: note::to_file_name(&title),
                content: content.into(),
            })
            .is_ok()
    }

    /// [`NoteCache::rename_note`], moving any pending edit to the new name.
    pub async fn rename_note(&self, old_title: &str, new_title: &str) -> Result<bool> {
        let renamed = self.cache.rename_note(old_title, new_title).await?;
        if renamed {
            let _ = self.messages.send(Message::Renamed {
                from: note::to_file_name(old_title),
                to: note::to_file_name(new_title.trim()),
            });
        }
        Ok(renamed)
    }

    /// [`NoteCache::delete_note`], discarding any pending edit for the note.
    pub async fn delete_note(&self) -> Result<bool> {
        let Some(title) = self.cache.selected_title() else {
            return Ok(false);
        };
        let deleted = self.cache.delete_note().await?;
        if deleted {
            let _ = self.messages.send(Message::Deleted { title });
        }
        Ok(deleted)
    }

    /// Flushes any pending edit and waits for the saver to stop.
    pub async fn shutdown(self) {
        let Self { messages, task, .. } = self;
        drop(messages);
        if let Err(e) = task.await {
            error!("auto-save task ended abnormally: {}", e);
        }
    }
}

fn apply(pending: &mut HashMap<String, String>, message: Message) {
    match message {
        Message::Edit { title, content } => {
            pending.insert(title, content);
        }
        Message::Renamed { from, to } => {
            if let Some(content) = pending.remove(&from) {
                pending.insert(to, content);
            }
        }
        Message::Deleted { title } => {
            pending.remove(&title);
        }
    }
}

async fn run(cache: Arc<NoteCache>, mut rx: mpsc::UnboundedReceiver<Message>, interval: Duration) {
    while let Some(first) = rx.recv().await {
        let mut pending: HashMap<String, String> = HashMap::new();
        apply(&mut pending, first);
        if pending.is_empty() {
            continue;
        }

        let window = tokio::time::sleep(interval);
        tokio::pin!(window);

        // Queued messages are applied before the window is allowed to close.
        loop {
            tokio::select! {
                biased;
                next = rx.recv() => match next {
                    Some(message) => apply(&mut pending, message),
                    None => break,
                },
                _ = &mut window => break,
            }
        }

        for (title, content) in pending {
            debug!("auto-saving {:?}", title);
            match cache.write_note(&title, &content).await {
                Ok(true) => {}
                Ok(false) => warn!("auto-save of {:?} was rejected", title),
                Err(e) => error!("auto-save of {:?} failed: {}", title, e),
            }
        }
    }
}

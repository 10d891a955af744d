use anyhow::{Context, Result};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::note;

const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

// Emitted when a note file changes outside the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteChange {
    pub kind: ChangeKind,
    pub title: String,
}

/// Keeps the underlying watcher alive; dropping it stops notifications.
pub struct NoteWatcher {
    _watcher: RecommendedWatcher,
}

impl NoteWatcher {
    pub fn start(root_dir: &Path, changes: UnboundedSender<NoteChange>) -> Result<Self> {
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("watch error: {}", e);
                        return;
                    }
                };
                let Some(kind) = classify(&event.kind) else {
                    return;
                };

                for path in &event.paths {
                    let Some(title) = note_title(path) else {
                        continue;
                    };
                    if !debouncer.accept(path, kind, Instant::now()) {
                        continue;
                    }
                    debug!("external change: {:?} {}", kind, title);
                    let _ = changes.send(NoteChange { kind, title });
                }
            },
            Config::default(),
        )
        .context("failed to create file watcher")?;

        watcher
            .watch(root_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {:?}", root_dir))?;

        Ok(Self { _watcher: watcher })
    }
}

fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Remove(_) => Some(ChangeKind::Deleted),
        _ => None,
    }
}

fn note_title(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    note::is_note_file(name).then(|| name.to_string())
}

// Drops repeat events for the same path inside the window. Deletions always
// pass so a removed note is never missed.
struct Debouncer {
    window: Duration,
    seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    fn accept(&mut self, path: &Path, kind: ChangeKind, now: Instant) -> bool {
        if self.seen.len() > 100 {
            let keep = self.window * 10;
            self.seen.retain(|_, last| now.duration_since(*last) < keep);
        }

        if kind == ChangeKind::Deleted {
            self.seen.remove(path);
            return true;
        }

        if let Some(last) = self.seen.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.seen.insert(path.to_path_buf(), now);
        true
    }
}

use std::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::note::{self, NoteInfo, SelectedNote};
use crate::store::NoteStore;

#[derive(Debug, Default)]
struct CacheState {
    // None until the first listing completes
    notes: Option<Vec<NoteInfo>>,
    // Selection is keyed by filename; the index is derived on demand
    selected: Option<String>,
}

/// In-memory mirror of the notes directory plus the current selection.
///
/// Mutations go to the [`NoteStore`] first and only touch the cached list
/// once the filesystem call succeeded. Expected failures (missing note,
/// name collision, invalid name) come back as `Ok(false)`; I/O failures are
/// returned as errors and leave the cache untouched.
pub struct NoteCache {
    store: NoteStore,
    state: RwLock<CacheState>,
}

impl NoteCache {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Builds the cache and performs the initial listing.
    pub async fn open(store: NoteStore) -> Result<Self> {
        let cache = Self::new(store);
        cache.load().await?;
        Ok(cache)
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Lists the notes directory and replaces the cached list, newest first.
    /// Safe to call again after external changes; the selection survives if
    /// its note still exists.
    pub async fn load(&self) -> Result<()> {
        let mut notes = self.store.list().await?;
        notes.sort_by(|a, b| b.last_edit_time.cmp(&a.last_edit_time));

        let mut state = self.state.write().expect("note cache write lock");
        let still_listed = state
            .selected
            .as_ref()
            .is_some_and(|selected| notes.iter().any(|n| &n.title == selected));
        if !still_listed {
            state.selected = None;
        }
        info!("loaded {} notes", notes.len());
        state.notes = Some(notes);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().expect("note cache read lock").notes.is_some()
    }

    /// Snapshot of the list, or `None` while the first load is pending.
    pub fn notes(&self) -> Option<Vec<NoteInfo>> {
        self.state.read().expect("note cache read lock").notes.clone()
    }

    pub fn selected_title(&self) -> Option<String> {
        self.state.read().expect("note cache read lock").selected.clone()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let state = self.state.read().expect("note cache read lock");
        let selected = state.selected.as_ref()?;
        state.notes.as_ref()?.iter().position(|n| &n.title == selected)
    }

    pub fn select_index(&self, index: usize) -> bool {
        let mut state = self.state.write().expect("note cache write lock");
        let title = state
            .notes
            .as_ref()
            .and_then(|notes| notes.get(index))
            .map(|n| n.title.clone());

        match title {
            Some(title) => {
                state.selected = Some(title);
                true
            }
            None => false,
        }
    }

    pub fn select_title(&self, title: &str) -> bool {
        let file_name = note::to_file_name(title);
        let mut state = self.state.write().expect("note cache write lock");
        let exists = state
            .notes
            .as_ref()
            .is_some_and(|notes| notes.iter().any(|n| n.title == file_name));

        if exists {
            state.selected = Some(file_name);
        }
        exists
    }

    pub fn clear_selection(&self) {
        self.state.write().expect("note cache write lock").selected = None;
    }

    /// Reads the selected note's content from disk. Nothing is cached, so a
    /// reselect always reflects external edits.
    pub async fn selected_note(&self) -> Result<Option<SelectedNote>> {
        let info = {
            let state = self.state.read().expect("note cache read lock");
            let Some(selected) = state.selected.as_ref() else {
                return Ok(None);
            };
            state
                .notes
                .as_ref()
                .and_then(|notes| notes.iter().find(|n| &n.title == selected))
                .cloned()
        };

        let Some(info) = info else {
            return Ok(None);
        };
        let content = self.store.read(&info.title).await?;
        Ok(Some(SelectedNote { info, content }))
    }

    pub async fn create_note(&self, filename: &str) -> Result<bool> {
        if !self.is_loaded() {
            return Ok(false);
        }
        if filename.trim().is_empty() {
            warn!("note creation canceled: no filename provided");
            return Ok(false);
        }

        let Some(title) = settle("create", self.store.create(filename).await)? else {
            return Ok(false);
        };

        let mut state = self.state.write().expect("note cache write lock");
        if let Some(notes) = state.notes.as_mut() {
            // Prepended without re-sorting; the newest note stays on top.
            notes.retain(|n| n.title != title);
            notes.insert(0, NoteInfo::new(title.clone(), note::now_millis()));
        }
        state.selected = Some(title);
        Ok(true)
    }

    pub async fn rename_note(&self, old_title: &str, new_title: &str) -> Result<bool> {
        let old_file = note::to_file_name(old_title);
        let new_file = note::to_file_name(new_title.trim());

        if let Err(e) = note::validate_name(new_title) {
            warn!("rename rejected: {}", e);
            return Ok(false);
        }

        {
            let state = self.state.read().expect("note cache read lock");
            let Some(notes) = state.notes.as_ref() else {
                return Ok(false);
            };
            let wanted = note::display_title(&new_file).to_lowercase();
            let collides = notes
                .iter()
                .filter(|n| n.title != old_file)
                .any(|n| n.display_title().to_lowercase() == wanted);
            if collides {
                warn!("rename rejected: a note named {:?} already exists", new_file);
                return Ok(false);
            }
        }

        if settle("rename", self.store.rename(&old_file, &new_file).await)?.is_none() {
            return Ok(false);
        }

        let mut state = self.state.write().expect("note cache write lock");
        if let Some(notes) = state.notes.as_mut() {
            for n in notes.iter_mut().filter(|n| n.title == old_file) {
                n.title = new_file.clone();
                n.last_edit_time = note::now_millis();
            }
        }
        if state.selected.as_deref() == Some(old_file.as_str()) {
            state.selected = Some(new_file);
        }
        Ok(true)
    }

    /// Deletes the selected note and clears the selection.
    pub async fn delete_note(&self) -> Result<bool> {
        let Some(title) = self.selected_title() else {
            return Ok(false);
        };

        if settle("delete", self.store.delete(&title).await)?.is_none() {
            return Ok(false);
        }

        let mut state = self.state.write().expect("note cache write lock");
        if let Some(notes) = state.notes.as_mut() {
            notes.retain(|n| n.title != title);
        }
        state.selected = None;
        Ok(true)
    }

    /// Writes `content` to the selected note.
    pub async fn save_note(&self, content: &str) -> Result<bool> {
        match self.selected_title() {
            Some(title) => self.write_note(&title, content).await,
            None => Ok(false),
        }
    }

    /// Writes `content` to a specific note and stamps its cached
    /// `last_edit_time` with the current time. Notes missing from the list
    /// (deleted or renamed since the edit) are not written, so a late save
    /// never brings a file back.
    pub async fn write_note(&self, title: &str, content: &str) -> Result<bool> {
        let file_name = note::to_file_name(title);
        let listed = self
            .state
            .read()
            .expect("note cache read lock")
            .notes
            .as_ref()
            .is_some_and(|notes| notes.iter().any(|n| n.title == file_name));
        if !listed {
            warn!("save rejected: {:?} is not in the note list", file_name);
            return Ok(false);
        }

        if settle("save", self.store.write(&file_name, content).await)?.is_none() {
            return Ok(false);
        }

        // Stamped with the clock rather than the file's mtime.
        let now = note::now_millis();
        let mut state = self.state.write().expect("note cache write lock");
        if let Some(notes) = state.notes.as_mut() {
            for n in notes.iter_mut().filter(|n| n.title == file_name) {
                n.last_edit_time = now;
            }
        }
        Ok(true)
    }
}

// Splits expected failures (logged, reported as None) from I/O errors.
fn settle<T>(action: &str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!("{} rejected: {}", action, e);
            Ok(None)
        }
        Err(e) => {
            error!("{} failed: {}", action, e);
            Err(e)
        }
    }
}

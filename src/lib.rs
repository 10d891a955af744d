pub mod autosave;
pub mod cache;
pub mod config;
pub mod error;
pub mod note;
pub mod settings;
pub mod store;
pub mod watcher;

#[cfg(feature = "desktop")]
pub mod desktop;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

pub use autosave::AutoSaver;
pub use cache::NoteCache;
pub use config::AppConfig;
pub use error::{NoteError, Result};
pub use note::{NoteContent, NoteInfo, SelectedNote};
pub use settings::{BackgroundMaterial, SaveOutcome, Settings, SettingsStore, Theme};
pub use store::NoteStore;
pub use watcher::{ChangeKind, NoteChange, NoteWatcher};

// App state, created once at startup and handed to whatever drives the UI
pub struct AppState {
    pub config: AppConfig,
    pub notes: Arc<NoteCache>,
    pub settings: SettingsStore,
}

impl AppState {
    /// State with the note list still pending; call [`NoteCache::load`] to
    /// populate it.
    pub fn new(config: AppConfig) -> Self {
        let store = NoteStore::new(&config);
        let settings = SettingsStore::new(&config);
        Self {
            notes: Arc::new(NoteCache::new(store)),
            settings,
            config,
        }
    }

    /// Creates the settings file if needed and performs the initial listing.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let state = Self::new(config);
        state.settings.ensure_exists().await?;
        state.notes.load().await?;
        Ok(state)
    }

    pub fn store(&self) -> &NoteStore {
        self.notes.store()
    }

    pub fn auto_saver(&self) -> AutoSaver {
        AutoSaver::spawn(Arc::clone(&self.notes), self.config.autosave_interval)
    }

    /// Starts watching the notes directory for changes made by other programs.
    pub fn watch_notes(&self) -> anyhow::Result<(NoteWatcher, mpsc::UnboundedReceiver<NoteChange>)> {
        std::fs::create_dir_all(&self.config.root_dir)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = NoteWatcher::start(&self.config.root_dir, tx)?;
        Ok((watcher, rx))
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("markdoom_lib=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

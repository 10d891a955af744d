use anyhow::Result;
use markdoom_lib::{AppConfig, NoteStore};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Config rooted in a fresh temp dir. Keep the `TempDir` alive for the test.
#[allow(dead_code)]
pub fn setup_config() -> Result<(TempDir, AppConfig)> {
    let dir = TempDir::new()?;
    let config = AppConfig::with_root(dir.path().join("MarkDoom"));
    Ok((dir, config))
}

/// Same as [`setup_config`] but an empty root stays empty.
#[allow(dead_code)]
pub fn setup_unseeded_config() -> Result<(TempDir, AppConfig)> {
    let (dir, mut config) = setup_config()?;
    config.seed_welcome_note = false;
    Ok((dir, config))
}

#[allow(dead_code)]
pub fn setup_store() -> Result<(TempDir, NoteStore)> {
    let (dir, config) = setup_unseeded_config()?;
    Ok((dir, NoteStore::new(&config)))
}

/// Writes a note directly on disk with a modification time `age` in the past.
#[allow(dead_code)]
pub fn write_aged_note(root: &Path, file_name: &str, content: &str, age: Duration) -> Result<()> {
    std::fs::create_dir_all(root)?;
    let path = root.join(file_name);
    std::fs::write(&path, content)?;
    let file = std::fs::File::options().write(true).open(&path)?;
    file.set_modified(SystemTime::now() - age)?;
    Ok(())
}

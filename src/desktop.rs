//! Tauri commands exposed to the renderer. Each command is a thin wrapper
//! over [`NoteStore`](crate::NoteStore) or [`SettingsStore`](crate::SettingsStore);
//! expected failures come back as `None`/`false`, environment failures as
//! an error string.

use tauri::State;
use tracing::warn;

use crate::error::NoteError;
use crate::note::{NoteContent, NoteInfo};
use crate::settings::{SaveOutcome, Settings};
use crate::AppState;

// Expected failures become `fallback`, everything else an error string
fn expected_or_err<T>(err: NoteError, fallback: T) -> Result<T, String> {
    if err.is_recoverable() {
        warn!("{}", err);
        Ok(fallback)
    } else {
        Err(err.to_string())
    }
}

#[tauri::command]
async fn get_notes(state: State<'_, AppState>) -> Result<Vec<NoteInfo>, String> {
    state.store().list().await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn read_note(title: String, state: State<'_, AppState>) -> Result<NoteContent, String> {
    state.store().read(&title).await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn write_note(
    title: String,
    content: NoteContent,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .store()
        .write(&title, &content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
async fn create_note(filename: String, state: State<'_, AppState>) -> Result<Option<String>, String> {
    match state.store().create(&filename).await {
        Ok(title) => Ok(Some(title)),
        Err(e) => expected_or_err(e, None),
    }
}

#[tauri::command]
async fn delete_note(title: String, state: State<'_, AppState>) -> Result<bool, String> {
    match state.store().delete(&title).await {
        Ok(()) => Ok(true),
        Err(e) => expected_or_err(e, false),
    }
}

#[tauri::command]
async fn rename_note(
    old_title: String,
    new_title: String,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    match state.store().rename(&old_title, &new_title).await {
        Ok(()) => Ok(true),
        Err(e) => expected_or_err(e, false),
    }
}

#[tauri::command]
async fn get_settings(state: State<'_, AppState>) -> Result<Settings, String> {
    state.settings.get().await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn save_settings(
    new_settings: Settings,
    state: State<'_, AppState>,
) -> Result<SaveOutcome, String> {
    state
        .settings
        .save(&new_settings)
        .await
        .map_err(|e| e.to_string())
}

/// Builder with the app state managed and every note/settings command
/// registered. The host binary adds plugins and calls `run` with its
/// generated context.
pub fn builder(state: AppState) -> tauri::Builder<tauri::Wry> {
    tauri::Builder::default()
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            get_notes,
            read_note,
            write_note,
            create_note,
            delete_note,
            rename_note,
            get_settings,
            save_settings,
        ])
}

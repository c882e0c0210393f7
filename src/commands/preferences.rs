//! Gallery preference command handlers.

use std::path::Path;
use std::sync::RwLock;

use crate::error::AppError;
use crate::preferences::{GalleryPreferences, PreferenceStore};
use crate::state::AppState;

/// Testable inner logic for `load_preferences`.
///
/// Reads the store at `path` into `prefs_lock` and returns the result.
pub(crate) fn load_preferences_inner(
    path: &Path,
    prefs_lock: &RwLock<GalleryPreferences>,
) -> Result<GalleryPreferences, AppError> {
    let loaded = PreferenceStore::open(path)?.gallery_preferences();
    let mut prefs = prefs_lock
        .write()
        .map_err(|e| AppError::Io(format!("preferences lock poisoned: {e}")))?;
    *prefs = loaded;
    Ok(loaded)
}

pub(crate) fn get_preferences_inner(
    prefs_lock: &RwLock<GalleryPreferences>,
) -> Result<GalleryPreferences, AppError> {
    let prefs = prefs_lock
        .read()
        .map_err(|e| AppError::Io(format!("preferences lock poisoned: {e}")))?;
    Ok(*prefs)
}

/// Testable inner logic for `set_preferences`.
///
/// `value` uses the stored `"view/grid/table"` form; bad segments fall back
/// to their defaults. The normalized value is persisted and returned.
pub(crate) fn set_preferences_inner(
    value: &str,
    path: &Path,
    prefs_lock: &RwLock<GalleryPreferences>,
) -> Result<GalleryPreferences, AppError> {
    let parsed = GalleryPreferences::parse(value);
    let mut store = PreferenceStore::open(path)?;
    store.set_gallery_preferences(parsed)?;
    let mut prefs = prefs_lock
        .write()
        .map_err(|e| AppError::Io(format!("preferences lock poisoned: {e}")))?;
    *prefs = parsed;
    Ok(parsed)
}

pub fn load_preferences(state: &AppState) -> Result<GalleryPreferences, AppError> {
    load_preferences_inner(&state.preferences_path(), &state.preferences)
}

pub fn get_preferences(state: &AppState) -> Result<GalleryPreferences, AppError> {
    get_preferences_inner(&state.preferences)
}

pub fn set_preferences(value: &str, state: &AppState) -> Result<GalleryPreferences, AppError> {
    set_preferences_inner(value, &state.preferences_path(), &state.preferences)
}

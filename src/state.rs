//! Application state shared by all command functions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use crate::config::AppConfig;
use crate::editor::EditSession;
use crate::gallery::FolderLoadGuard;
use crate::preferences::{self, GalleryPreferences};
use crate::scene::MemoryScene;

/// One open edit dialog.
///
/// Sessions hold boxed `FnMut` undo closures, which are `Send` but not
/// `Sync`, hence the `Mutex` rather than an `RwLock`.
pub type SessionHandle = Arc<Mutex<EditSession<MemoryScene>>>;

/// Root application state.
///
/// The session map and preferences are behind [`RwLock`]s so that
/// concurrent read commands (listing sessions, reading preferences) do not
/// block each other. Individual sessions are locked separately, so a long
/// edit in one dialog never blocks another.
pub struct AppState {
    /// Open edit sessions, keyed by the id handed out by `open_session`.
    pub sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    /// Gallery view preferences, mirrored to the preference store on change.
    pub preferences: RwLock<GalleryPreferences>,
    /// Guards folder listings against duplicate loads.
    pub folder_loads: FolderLoadGuard,
    pub config: AppConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            preferences: RwLock::new(GalleryPreferences::default()),
            folder_loads: FolderLoadGuard::new(),
            config,
        }
    }

    /// Where gallery preferences are persisted.
    pub fn preferences_path(&self) -> PathBuf {
        self.config
            .preferences
            .path
            .clone()
            .unwrap_or_else(preferences::default_path)
    }

    /// A fresh session configured from `[editor]`.
    pub fn new_session(&self) -> EditSession<MemoryScene> {
        EditSession::with_history_limit(self.config.editor.history_limit())
    }
}

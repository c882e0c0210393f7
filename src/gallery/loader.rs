//! Duplicate-load guard for folder listings.
//!
//! Navigation can fire several loads for the same folder in quick
//! succession. The guard lets one through and refuses the rest until the
//! ticket is dropped.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct LoadState {
    loading: bool,
    last_folder: Option<String>,
}

#[derive(Debug, Default)]
pub struct FolderLoadGuard {
    state: Mutex<LoadState>,
}

/// Held for the duration of one load. Dropping it releases the guard; call
/// [`LoadTicket::complete`] first to record the folder as loaded.
#[derive(Debug)]
pub struct LoadTicket<'a> {
    guard: &'a FolderLoadGuard,
    folder_id: String,
}

impl FolderLoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load of `folder_id`.
    ///
    /// Returns `None` while another load is in flight, or when `folder_id`
    /// is the folder already shown and `force` is false.
    pub fn try_begin(&self, folder_id: &str, force: bool) -> Option<LoadTicket<'_>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.loading {
            tracing::debug!(folder_id, "load already in flight, skipping");
            return None;
        }
        if !force && state.last_folder.as_deref() == Some(folder_id) {
            tracing::debug!(folder_id, "folder already loaded, skipping");
            return None;
        }
        state.loading = true;
        Some(LoadTicket {
            guard: self,
            folder_id: folder_id.to_string(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).loading
    }

    pub fn last_folder(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_folder
            .clone()
    }

    /// Forget the last loaded folder so the next load goes through, e.g.
    /// after files were deleted or uploaded.
    pub fn invalidate(&self) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).last_folder = None;
    }
}

impl LoadTicket<'_> {
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    pub fn complete(self) {
        let mut state = self.guard.state.lock().unwrap_or_else(|e| e.into_inner());
        state.last_folder = Some(self.folder_id.clone());
    }
}

impl Drop for LoadTicket<'_> {
    fn drop(&mut self) {
        self.guard
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .loading = false;
    }
}

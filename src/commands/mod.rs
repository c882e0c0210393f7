//! Command handlers.
//!
//! Sub-modules are grouped by concern:
//! - [`session`]: edit session lifecycle, tools, snapshot and action undo
//! - [`gallery`]: folder listing, bulk delete, upload of edited images
//! - [`preferences`]: gallery view preferences
//!
//! Handlers follow the `_inner` pattern: each takes the pieces of
//! [`crate::state::AppState`] it needs and returns `Result<_, AppError>`, so
//! any front end (the CLI, an IPC bridge, tests) can call it directly.

pub mod gallery;
pub mod preferences;
pub mod session;

use std::collections::HashMap;
use std::sync::{MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::editor::EditSession;
use crate::error::AppError;
use crate::scene::MemoryScene;
use crate::state::SessionHandle;

pub(crate) type Sessions = RwLock<HashMap<Uuid, SessionHandle>>;

/// Parse a session id string into a [`Uuid`].
pub(crate) fn parse_session_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidInput(format!("invalid session id: {id}")))
}

pub(crate) fn read_sessions(
    sessions: &Sessions,
) -> Result<RwLockReadGuard<'_, HashMap<Uuid, SessionHandle>>, AppError> {
    sessions
        .read()
        .map_err(|e| AppError::Io(format!("session registry lock poisoned: {e}")))
}

pub(crate) fn write_sessions(
    sessions: &Sessions,
) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, SessionHandle>>, AppError> {
    sessions
        .write()
        .map_err(|e| AppError::Io(format!("session registry lock poisoned: {e}")))
}

/// Look up a session by id, releasing the registry lock before returning.
pub(crate) fn find_session(id: &str, sessions: &Sessions) -> Result<SessionHandle, AppError> {
    let uuid = parse_session_id(id)?;
    read_sessions(sessions)?
        .get(&uuid)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))
}

pub(crate) fn lock_session(
    handle: &SessionHandle,
) -> Result<MutexGuard<'_, EditSession<MemoryScene>>, AppError> {
    handle
        .lock()
        .map_err(|e| AppError::Io(format!("session lock poisoned: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn malformed_session_id_is_invalid_input() {
        let state = AppState::default();
        let result = find_session("not-a-uuid", &state.sessions);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn unknown_session_id_is_not_found() {
        let state = AppState::default();
        let id = Uuid::new_v4().to_string();
        let result = find_session(&id, &state.sessions);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

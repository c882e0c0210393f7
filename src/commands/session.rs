//! Edit session command handlers.
//!
//! Every handler looks the session up by id, locks it, performs one
//! operation, and answers with a fresh [`SessionView`]. Unknown ids yield
//! [`AppError::NotFound`].

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::editor::{CleanupReport, EditAction, EditSession, Snapshot};
use crate::error::AppError;
use crate::models::{ActiveTool, MediaFile, ToolbarControls};
use crate::scene::{MemoryScene, NodeId, SceneGraph, Tag};
use crate::state::AppState;

use super::{find_session, lock_session, parse_session_id, write_sessions, Sessions};

/// Node names of the image layer in a freshly opened scene.
pub const IMAGE_GROUP_NAME: &str = "imageGroup";
pub const IMAGE_NODE_NAME: &str = "image";

// ── DTOs ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionInput {
    pub file: MediaFile,
    /// Previously serialized scene to resume from. When absent a scene with
    /// just the image layer is created.
    #[serde(default)]
    pub scene: Option<String>,
}

/// Serializable view of one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub file: Option<MediaFile>,
    pub image_node: Option<NodeId>,
    pub image_group: Option<NodeId>,
    pub active_tool: Option<ActiveTool>,
    pub toolbar_controls: Option<ToolbarControls>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub actions: Vec<String>,
    pub state_cursor: isize,
    pub state_count: usize,
    pub can_undo_state: bool,
    pub can_redo_state: bool,
    pub has_pre_tool_snapshot: bool,
    pub node_count: usize,
    pub error: Option<String>,
}

impl SessionView {
    fn new(id: &str, session: &EditSession<MemoryScene>) -> Self {
        let history = session.edit_history();
        let states = session.state_history();
        Self {
            id: id.to_string(),
            file: session.file().cloned(),
            image_node: session.image_node(),
            image_group: session.image_group(),
            active_tool: session.active_tool(),
            toolbar_controls: session.toolbar_controls().cloned(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            actions: history.labels(),
            state_cursor: states.cursor(),
            state_count: states.len(),
            can_undo_state: states.can_undo(),
            can_redo_state: states.can_redo(),
            has_pre_tool_snapshot: session.pre_tool_snapshot().is_some(),
            node_count: session.scene().map(MemoryScene::len).unwrap_or(0),
            error: session.error().map(str::to_string),
        }
    }
}

/// Result of a tool switch: the new view plus what the switch removed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolChange {
    pub session: SessionView,
    pub cleanup: Option<CleanupReport>,
}

/// Result of a move on the snapshot track.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStep {
    pub session: SessionView,
    /// The snapshot moved to (or peeked at); `None` at either end.
    pub snapshot: Option<Snapshot>,
}

/// Result of a move on the action track.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    pub session: SessionView,
    pub applied: bool,
}

/// Run `f` against the locked session and return its output with a view.
fn with_session<T>(
    id: &str,
    sessions: &Sessions,
    f: impl FnOnce(&mut EditSession<MemoryScene>) -> Result<T, AppError>,
) -> Result<(T, SessionView), AppError> {
    let handle = find_session(id, sessions)?;
    let mut session = lock_session(&handle)?;
    let out = f(&mut *session)?;
    Ok((out, SessionView::new(id, &session)))
}

fn base_scene(file: &MediaFile) -> Result<(MemoryScene, NodeId, NodeId), AppError> {
    let mut scene = MemoryScene::new();
    let group = scene.add_node(IMAGE_GROUP_NAME, "Group");
    let image = scene.add_node(IMAGE_NODE_NAME, "Image");
    if let Some(url) = &file.url {
        scene.set_attr(image, "src", Value::String(url.clone()))?;
    }
    if let (Some(w), Some(h)) = (file.width, file.height) {
        scene.set_attr(image, "width", Value::from(w))?;
        scene.set_attr(image, "height", Value::from(h))?;
    }
    Ok((scene, image, group))
}

// ── open / close / get ────────────────────────────────────────────────────────

/// Testable inner logic for `open_session`.
pub(crate) fn open_session_inner(
    input: OpenSessionInput,
    state: &AppState,
) -> Result<SessionView, AppError> {
    let (scene, image, group) = match input.scene.as_deref() {
        Some(json) => {
            let mut scene = MemoryScene::new();
            scene.restore(json)?;
            let image = scene.find_by_tag(&Tag::name(IMAGE_NODE_NAME)).first().copied();
            let group = scene.find_by_tag(&Tag::name(IMAGE_GROUP_NAME)).first().copied();
            (scene, image, group)
        }
        None => {
            let (scene, image, group) = base_scene(&input.file)?;
            (scene, Some(image), Some(group))
        }
    };

    let mut session = state.new_session();
    session.load(input.file, scene, image, group)?;

    let id = Uuid::new_v4();
    let view = SessionView::new(&id.to_string(), &session);
    write_sessions(&state.sessions)?.insert(id, Arc::new(Mutex::new(session)));
    tracing::info!(session = %id, "session opened");
    Ok(view)
}

/// Testable inner logic for `close_session`.
pub(crate) fn close_session_inner(id: &str, sessions: &Sessions) -> Result<(), AppError> {
    let uuid = parse_session_id(id)?;
    let removed = write_sessions(sessions)?.remove(&uuid);
    match removed {
        Some(_) => {
            tracing::info!(session = %uuid, "session closed");
            Ok(())
        }
        None => Err(AppError::NotFound(format!("session {id} not found"))),
    }
}

/// Testable inner logic for `get_session_snapshot`.
pub(crate) fn get_session_snapshot_inner(
    id: &str,
    sessions: &Sessions,
) -> Result<SessionView, AppError> {
    with_session(id, sessions, |_| Ok(())).map(|(_, view)| view)
}

/// Serialized scene of a session, for persisting or exporting.
pub(crate) fn export_scene_inner(id: &str, sessions: &Sessions) -> Result<String, AppError> {
    with_session(id, sessions, |session| {
        let scene = session.scene().ok_or(AppError::NoScene)?;
        Ok(scene.serialize()?)
    })
    .map(|(json, _)| json)
}

// ── tool lifecycle ────────────────────────────────────────────────────────────

/// Testable inner logic for `set_active_tool`.
///
/// `tool` is a tool name; an empty string releases the active tool.
pub(crate) fn set_active_tool_inner(
    id: &str,
    tool: &str,
    sessions: &Sessions,
) -> Result<ToolChange, AppError> {
    let tool = ActiveTool::parse_optional(tool)?;
    let (report, session) = with_session(id, sessions, |s| s.set_active_state(tool))?;
    Ok(ToolChange {
        session,
        cleanup: Some(report),
    })
}

/// Testable inner logic for `cancel_active_tool`.
pub(crate) fn cancel_active_tool_inner(
    id: &str,
    sessions: &Sessions,
) -> Result<ToolChange, AppError> {
    let (cleanup, session) = with_session(id, sessions, |s| Ok(s.cancel_active_tool()))?;
    Ok(ToolChange { session, cleanup })
}

/// Testable inner logic for `apply_active_tool`.
pub(crate) fn apply_active_tool_inner(
    id: &str,
    sessions: &Sessions,
) -> Result<ToolChange, AppError> {
    let (cleanup, session) = with_session(id, sessions, EditSession::apply_active_tool)?;
    Ok(ToolChange { session, cleanup })
}

/// Testable inner logic for `set_toolbar_controls`.
pub(crate) fn set_toolbar_controls_inner(
    id: &str,
    controls: ToolbarControls,
    sessions: &Sessions,
) -> Result<SessionView, AppError> {
    with_session(id, sessions, |s| s.set_toolbar_controls(controls)).map(|(_, view)| view)
}

// ── snapshot track ────────────────────────────────────────────────────────────

/// Testable inner logic for `take_snapshot`.
pub(crate) fn take_snapshot_inner(id: &str, sessions: &Sessions) -> Result<SessionView, AppError> {
    with_session(id, sessions, EditSession::take_snapshot).map(|(_, view)| view)
}

/// Testable inner logic for `undo_state`.
///
/// Restores the previous snapshot into the scene and moves the cursor back.
/// With `peek` the cursor stays put and nothing is restored. A failed restore
/// leaves the cursor where it was.
pub(crate) fn undo_state_inner(
    id: &str,
    peek: bool,
    sessions: &Sessions,
) -> Result<StateStep, AppError> {
    let (snapshot, session) = with_session(id, sessions, |s| {
        if peek {
            Ok(s.undo_state(true))
        } else {
            s.restore_previous_state()
        }
    })?;
    Ok(StateStep { session, snapshot })
}

/// Testable inner logic for `redo_state`.
pub(crate) fn redo_state_inner(id: &str, sessions: &Sessions) -> Result<StateStep, AppError> {
    let (snapshot, session) = with_session(id, sessions, EditSession::restore_next_state)?;
    Ok(StateStep { session, snapshot })
}

// ── action track ──────────────────────────────────────────────────────────────

/// Testable inner logic for `set_node_attr`.
///
/// Sets `key` on `node` and records the change on the action track.
pub(crate) fn set_node_attr_inner(
    id: &str,
    node: NodeId,
    key: &str,
    value: Value,
    sessions: &Sessions,
) -> Result<SessionView, AppError> {
    with_session(id, sessions, |s| {
        let scene = s.scene_mut().ok_or(AppError::NoScene)?;
        let previous = scene.attr(node, key).cloned().unwrap_or(Value::Null);
        scene.set_attr(node, key, value.clone())?;

        let undo_key = key.to_string();
        let redo_key = key.to_string();
        s.add_edit_action(EditAction::new(
            format!("set {key} on {node}"),
            move |scene: &mut MemoryScene| {
                if let Err(e) = scene.set_attr(node, &undo_key, previous.clone()) {
                    tracing::warn!(error = %e, "undo of attribute change failed");
                }
            },
            move |scene: &mut MemoryScene| {
                if let Err(e) = scene.set_attr(node, &redo_key, value.clone()) {
                    tracing::warn!(error = %e, "redo of attribute change failed");
                }
            },
        ));
        Ok(())
    })
    .map(|(_, view)| view)
}

/// Testable inner logic for `undo`.
pub(crate) fn undo_action_inner(id: &str, sessions: &Sessions) -> Result<ActionStep, AppError> {
    let (applied, session) = with_session(id, sessions, |s| Ok(s.undo()))?;
    Ok(ActionStep { session, applied })
}

/// Testable inner logic for `redo`.
pub(crate) fn redo_action_inner(id: &str, sessions: &Sessions) -> Result<ActionStep, AppError> {
    let (applied, session) = with_session(id, sessions, |s| Ok(s.redo()))?;
    Ok(ActionStep { session, applied })
}

// ── scene helpers ─────────────────────────────────────────────────────────────

/// Add a node to the session's scene, e.g. a helper drawn by a tool.
pub(crate) fn add_node_inner(
    id: &str,
    name: &str,
    class: &str,
    sessions: &Sessions,
) -> Result<NodeId, AppError> {
    with_session(id, sessions, |s| {
        let scene = s.scene_mut().ok_or(AppError::NoScene)?;
        Ok(scene.add_node(name, class))
    })
    .map(|(node, _)| node)
}

/// Testable inner logic for `cleanup_temp_nodes`.
pub(crate) fn cleanup_temp_nodes_inner(
    id: &str,
    sessions: &Sessions,
) -> Result<CleanupReport, AppError> {
    with_session(id, sessions, |s| Ok(s.cleanup_temp_nodes())).map(|(report, _)| report)
}

// ── Public command API ────────────────────────────────────────────────────────

/// Open an edit session for `input.file` and register it.
pub fn open_session(input: OpenSessionInput, state: &AppState) -> Result<SessionView, AppError> {
    open_session_inner(input, state)
}

pub fn close_session(id: &str, state: &AppState) -> Result<(), AppError> {
    close_session_inner(id, &state.sessions)
}

pub fn get_session_snapshot(id: &str, state: &AppState) -> Result<SessionView, AppError> {
    get_session_snapshot_inner(id, &state.sessions)
}

pub fn export_scene(id: &str, state: &AppState) -> Result<String, AppError> {
    export_scene_inner(id, &state.sessions)
}

pub fn set_active_tool(id: &str, tool: &str, state: &AppState) -> Result<ToolChange, AppError> {
    set_active_tool_inner(id, tool, &state.sessions)
}

pub fn cancel_active_tool(id: &str, state: &AppState) -> Result<ToolChange, AppError> {
    cancel_active_tool_inner(id, &state.sessions)
}

pub fn apply_active_tool(id: &str, state: &AppState) -> Result<ToolChange, AppError> {
    apply_active_tool_inner(id, &state.sessions)
}

pub fn set_toolbar_controls(
    id: &str,
    controls: ToolbarControls,
    state: &AppState,
) -> Result<SessionView, AppError> {
    set_toolbar_controls_inner(id, controls, &state.sessions)
}

pub fn take_snapshot(id: &str, state: &AppState) -> Result<SessionView, AppError> {
    take_snapshot_inner(id, &state.sessions)
}

pub fn undo_state(id: &str, peek: bool, state: &AppState) -> Result<StateStep, AppError> {
    undo_state_inner(id, peek, &state.sessions)
}

pub fn redo_state(id: &str, state: &AppState) -> Result<StateStep, AppError> {
    redo_state_inner(id, &state.sessions)
}

pub fn set_node_attr(
    id: &str,
    node: NodeId,
    key: &str,
    value: Value,
    state: &AppState,
) -> Result<SessionView, AppError> {
    set_node_attr_inner(id, node, key, value, &state.sessions)
}

pub fn undo(id: &str, state: &AppState) -> Result<ActionStep, AppError> {
    undo_action_inner(id, &state.sessions)
}

pub fn redo(id: &str, state: &AppState) -> Result<ActionStep, AppError> {
    redo_action_inner(id, &state.sessions)
}

pub fn add_node(id: &str, name: &str, class: &str, state: &AppState) -> Result<NodeId, AppError> {
    add_node_inner(id, name, class, &state.sessions)
}

pub fn cleanup_temp_nodes(id: &str, state: &AppState) -> Result<CleanupReport, AppError> {
    cleanup_temp_nodes_inner(id, &state.sessions)
}

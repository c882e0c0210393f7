//! Per-dialog image-edit session.
//!
//! [`EditSession`] coordinates which tool owns canvas input, keeps both undo
//! tracks, and removes transient tool UI when tools change. It owns its
//! scene through the [`SceneGraph`] capability and never reaches into a
//! concrete canvas library.
//!
//! # Tool lifecycle
//! ```text
//!   none ──set_active_state(Some(t))──▶ t      (pre-tool snapshot captured)
//!   t    ──apply_active_tool()────────▶ none   (changes kept, snapshot pushed)
//!   t    ──cancel_active_tool()───────▶ none   (scene rolled back)
//!   t    ──set_active_state(None)─────▶ none   (pre-tool snapshot dropped)
//! ```
//!
//! # Undo precedence
//! The action track ([`EditSession::undo`] / [`EditSession::redo`]) and the
//! snapshot track ([`EditSession::undo_state`] / [`EditSession::redo_state`])
//! are independent. Neither subsumes the other; callers pick one per gesture.

use crate::error::{AppError, RESTORE_FAILED_MESSAGE};
use crate::models::{ActiveTool, MediaFile, ToolbarControls};
use crate::scene::{NodeId, SceneGraph};

use super::cleanup::{self, CleanupReport};
use super::history::{EditAction, EditHistory, Snapshot, StateHistory, DEFAULT_HISTORY_LIMIT};

#[derive(Debug)]
pub struct EditSession<S> {
    file: Option<MediaFile>,
    scene: Option<S>,
    image_node: Option<NodeId>,
    image_group: Option<NodeId>,
    active_tool: Option<ActiveTool>,
    edit_history: EditHistory<S>,
    state_history: StateHistory,
    pre_tool_snapshot: Option<Snapshot>,
    /// Action-track position when the active tool was entered.
    pre_tool_checkpoint: Option<usize>,
    toolbar_controls: Option<ToolbarControls>,
    error: Option<String>,
    history_limit: Option<usize>,
}

impl<S: SceneGraph> Default for EditSession<S> {
    fn default() -> Self {
        Self::with_history_limit(Some(DEFAULT_HISTORY_LIMIT))
    }
}

impl<S: SceneGraph> EditSession<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(history_limit: Option<usize>) -> Self {
        Self {
            file: None,
            scene: None,
            image_node: None,
            image_group: None,
            active_tool: None,
            edit_history: EditHistory::with_limit(history_limit),
            state_history: StateHistory::with_limit(history_limit),
            pre_tool_snapshot: None,
            pre_tool_checkpoint: None,
            toolbar_controls: None,
            error: None,
            history_limit,
        }
    }

    /// Start editing `file` in `scene`.
    ///
    /// Clears any previous session state, then records the untouched scene as
    /// the first snapshot so the snapshot track always has a base state.
    pub fn load(
        &mut self,
        file: MediaFile,
        scene: S,
        image_node: Option<NodeId>,
        image_group: Option<NodeId>,
    ) -> Result<(), AppError> {
        self.reset();
        tracing::info!(file = %file.filename, "edit session loaded");
        self.file = Some(file);
        self.scene = Some(scene);
        self.image_node = image_node;
        self.image_group = image_group;
        self.take_snapshot()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn file(&self) -> Option<&MediaFile> {
        self.file.as_ref()
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    pub fn image_node(&self) -> Option<NodeId> {
        self.image_node
    }

    pub fn image_group(&self) -> Option<NodeId> {
        self.image_group
    }

    pub fn active_tool(&self) -> Option<ActiveTool> {
        self.active_tool
    }

    pub fn edit_history(&self) -> &EditHistory<S> {
        &self.edit_history
    }

    pub fn state_history(&self) -> &StateHistory {
        &self.state_history
    }

    pub fn pre_tool_snapshot(&self) -> Option<&Snapshot> {
        self.pre_tool_snapshot.as_ref()
    }

    pub fn toolbar_controls(&self) -> Option<&ToolbarControls> {
        self.toolbar_controls.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    // ── Tool lifecycle ────────────────────────────────────────────────────

    /// Hand input focus to `tool`, or release it with `None`.
    ///
    /// Entering a tool captures the current scene as the pre-tool snapshot.
    /// Switching directly between tools first removes the previous tool's
    /// helpers; the returned report covers that sweep. Releasing focus drops
    /// the pending snapshot without touching the scene.
    pub fn set_active_state(
        &mut self,
        tool: Option<ActiveTool>,
    ) -> Result<CleanupReport, AppError> {
        if tool == self.active_tool {
            return Ok(CleanupReport::default());
        }

        let Some(next) = tool else {
            tracing::debug!(previous = ?self.active_tool, "tool released");
            self.active_tool = None;
            self.toolbar_controls = None;
            self.pre_tool_snapshot = None;
            self.pre_tool_checkpoint = None;
            return Ok(CleanupReport::default());
        };

        let scene = self.scene.as_mut().ok_or(AppError::NoScene)?;

        let mut report = CleanupReport::default();
        if let Some(previous) = self.active_tool {
            report = cleanup::remove_matching(scene, &cleanup::tool_selectors(previous));
        }

        let json = scene.serialize()?;
        self.pre_tool_snapshot = Some(Snapshot::new(json, self.active_tool));
        self.pre_tool_checkpoint = Some(self.edit_history.checkpoint());
        self.active_tool = Some(next);
        self.toolbar_controls = Some(ToolbarControls::defaults_for(next));
        tracing::debug!(tool = %next, "tool activated");
        Ok(report)
    }

    /// Abandon the active tool and roll the scene back to where it was when
    /// the tool was activated.
    ///
    /// Edit actions recorded while the tool was active are dropped with the
    /// rollback, so a later redo cannot bring them back. Returns `None` when
    /// no tool is active. A failed rollback sets the restore banner, keeps
    /// the action track, and still releases the tool.
    pub fn cancel_active_tool(&mut self) -> Option<CleanupReport> {
        let tool = self.active_tool?;
        let report = self.cleanup_tool_specific(tool);

        let checkpoint = self.pre_tool_checkpoint.take();
        if let Some(snapshot) = self.pre_tool_snapshot.take() {
            // Errors are already logged and surfaced through `self.error`.
            if self.restore_snapshot(&snapshot).is_ok() {
                if let Some(checkpoint) = checkpoint {
                    self.edit_history.truncate_to(checkpoint);
                }
            }
        }

        self.active_tool = None;
        self.toolbar_controls = None;
        tracing::debug!(tool = %tool, clean = report.is_clean(), "tool cancelled");
        Some(report)
    }

    /// Keep the active tool's changes and release it.
    ///
    /// Helpers are removed before the resulting scene is pushed onto the
    /// snapshot track. Returns `Ok(None)` when no tool is active.
    pub fn apply_active_tool(&mut self) -> Result<Option<CleanupReport>, AppError> {
        let Some(tool) = self.active_tool else {
            return Ok(None);
        };
        let report = self.cleanup_tool_specific(tool);
        self.take_snapshot()?;
        self.active_tool = None;
        self.toolbar_controls = None;
        self.pre_tool_snapshot = None;
        self.pre_tool_checkpoint = None;
        tracing::debug!(tool = %tool, clean = report.is_clean(), "tool applied");
        Ok(Some(report))
    }

    /// Replace the toolbar state. The controls must belong to the active tool.
    pub fn set_toolbar_controls(&mut self, controls: ToolbarControls) -> Result<(), AppError> {
        if self.active_tool != Some(controls.tool()) {
            return Err(AppError::InvalidInput(format!(
                "toolbar controls for '{}' do not match the active tool",
                controls.tool()
            )));
        }
        self.toolbar_controls = Some(controls);
        Ok(())
    }

    // ── Snapshot track ────────────────────────────────────────────────────

    /// Serialize the scene and push it onto the snapshot track.
    pub fn take_snapshot(&mut self) -> Result<(), AppError> {
        let scene = self.scene.as_ref().ok_or(AppError::NoScene)?;
        let json = scene.serialize()?;
        self.state_history.push(Snapshot::new(json, self.active_tool));
        tracing::debug!(
            cursor = self.state_history.cursor(),
            len = self.state_history.len(),
            "snapshot taken"
        );
        Ok(())
    }

    /// Snapshot one step back; with `peek` the cursor does not move.
    pub fn undo_state(&mut self, peek: bool) -> Option<Snapshot> {
        self.state_history.undo(peek).cloned()
    }

    /// Snapshot one step forward.
    pub fn redo_state(&mut self) -> Option<Snapshot> {
        self.state_history.redo().cloned()
    }

    /// Step the snapshot track back and restore that snapshot into the
    /// scene. The cursor only moves once the restore succeeded.
    pub fn restore_previous_state(&mut self) -> Result<Option<Snapshot>, AppError> {
        let Some(snapshot) = self.state_history.undo(true).cloned() else {
            return Ok(None);
        };
        self.restore_snapshot(&snapshot)?;
        self.state_history.undo(false);
        Ok(Some(snapshot))
    }

    /// Step the snapshot track forward and restore that snapshot into the
    /// scene. The cursor only moves once the restore succeeded.
    pub fn restore_next_state(&mut self) -> Result<Option<Snapshot>, AppError> {
        let Some(snapshot) = self.state_history.peek_redo().cloned() else {
            return Ok(None);
        };
        self.restore_snapshot(&snapshot)?;
        self.state_history.redo();
        Ok(Some(snapshot))
    }

    /// Push `snapshot` back into the scene.
    ///
    /// On failure the restore banner is set, the error is logged, and
    /// [`AppError::Restore`] is returned.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), AppError> {
        let scene = self.scene.as_mut().ok_or(AppError::NoScene)?;
        match scene.restore(&snapshot.json) {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to restore snapshot");
                self.error = Some(RESTORE_FAILED_MESSAGE.to_string());
                Err(AppError::Restore(e.to_string()))
            }
        }
    }

    // ── Action track ──────────────────────────────────────────────────────

    /// Record an edit that has already been applied to the scene.
    pub fn add_edit_action(&mut self, action: EditAction<S>) {
        tracing::debug!(action = action.label(), "edit action recorded");
        self.edit_history.add(action);
    }

    /// Revert the latest edit. `false` at the start of history or when no
    /// scene is loaded.
    pub fn undo(&mut self) -> bool {
        match self.scene.as_mut() {
            Some(scene) => self.edit_history.undo(scene),
            None => false,
        }
    }

    /// Re-apply the next undone edit. `false` at the end of history or when
    /// no scene is loaded.
    pub fn redo(&mut self) -> bool {
        match self.scene.as_mut() {
            Some(scene) => self.edit_history.redo(scene),
            None => false,
        }
    }

    // ── Cleanup ───────────────────────────────────────────────────────────

    /// Remove every transient helper node, whichever tool drew it.
    pub fn cleanup_temp_nodes(&mut self) -> CleanupReport {
        match self.scene.as_mut() {
            Some(scene) => cleanup::remove_matching(scene, &cleanup::temp_selectors()),
            None => CleanupReport::default(),
        }
    }

    /// Remove the helper nodes drawn by `tool`.
    pub fn cleanup_tool_specific(&mut self, tool: ActiveTool) -> CleanupReport {
        match self.scene.as_mut() {
            Some(scene) => cleanup::remove_matching(scene, &cleanup::tool_selectors(tool)),
            None => CleanupReport::default(),
        }
    }

    // ── Errors and reset ──────────────────────────────────────────────────

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Clear file, scene, tool and both histories. The session stays usable
    /// for the next image.
    pub fn reset(&mut self) {
        self.file = None;
        self.scene = None;
        self.image_node = None;
        self.image_group = None;
        self.active_tool = None;
        self.edit_history = EditHistory::with_limit(self.history_limit);
        self.state_history = StateHistory::with_limit(self.history_limit);
        self.pre_tool_snapshot = None;
        self.pre_tool_checkpoint = None;
        self.toolbar_controls = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    fn make_file() -> MediaFile {
        serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "filename": "harbor.jpg",
            "mimeType": "image/jpeg"
        }))
        .expect("media file")
    }

    fn loaded_session() -> EditSession<MemoryScene> {
        let mut scene = MemoryScene::new();
        let group = scene.add_node("imageGroup", "Group");
        let image = scene.add_node("image", "Image");
        let mut session = EditSession::new();
        session
            .load(make_file(), scene, Some(image), Some(group))
            .expect("load session");
        session
    }

    fn noop_action() -> EditAction<MemoryScene> {
        EditAction::new("noop", |_: &mut MemoryScene| {}, |_: &mut MemoryScene| {})
    }

    fn scene_len(session: &EditSession<MemoryScene>) -> usize {
        session.scene().map(MemoryScene::len).unwrap_or(0)
    }

    #[test]
    fn load_records_base_snapshot() {
        let session = loaded_session();
        assert_eq!(session.state_history().len(), 1);
        assert_eq!(session.state_history().cursor(), 0);
        assert_eq!(session.file().map(|f| f.id.as_str()), Some("m1"));
        assert!(session.image_node().is_some());
    }

    #[test]
    fn entering_tool_captures_pre_tool_snapshot() {
        let mut session = loaded_session();
        session
            .set_active_state(Some(ActiveTool::Crop))
            .expect("activate crop");
        assert_eq!(session.active_tool(), Some(ActiveTool::Crop));
        assert!(session.pre_tool_snapshot().is_some());
        assert_eq!(
            session.toolbar_controls().map(ToolbarControls::tool),
            Some(ActiveTool::Crop)
        );
    }

    #[test]
    fn releasing_tool_clears_pre_tool_snapshot() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Crop)).expect("crop");
        session.set_active_state(None).expect("release");
        assert!(session.pre_tool_snapshot().is_none());
        assert!(session.active_tool().is_none());
        assert!(session.toolbar_controls().is_none());
    }

    #[test]
    fn entering_tool_without_scene_fails() {
        let mut session: EditSession<MemoryScene> = EditSession::new();
        let result = session.set_active_state(Some(ActiveTool::Blur));
        assert!(matches!(result, Err(AppError::NoScene)));
        assert!(session.active_tool().is_none());
    }

    #[test]
    fn switching_tools_cleans_previous_helpers_and_resnapshots() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Crop)).expect("crop");
        assert_eq!(
            session.pre_tool_snapshot().map(|s| s.tool),
            Some(None),
            "first snapshot is taken with no tool active"
        );
        session
            .scene_mut()
            .expect("scene")
            .add_node("cropOverlay", "Rect");

        let report = session
            .set_active_state(Some(ActiveTool::Blur))
            .expect("blur");

        assert_eq!(report.removed.len(), 1);
        assert_eq!(session.active_tool(), Some(ActiveTool::Blur));
        let second = session.pre_tool_snapshot().expect("snapshot");
        assert_eq!(second.tool, Some(ActiveTool::Crop));
        assert!(
            !second.json.contains("cropOverlay"),
            "helpers are removed before the scene is captured"
        );
    }

    #[test]
    fn cancel_rolls_back_scene_and_releases_tool() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Blur)).expect("blur");
        {
            let scene = session.scene_mut().expect("scene");
            scene.add_node("blurRegion", "Rect");
            scene.add_node("pixelatedPatch", "Image");
        }
        assert_eq!(scene_len(&session), 4);

        let report = session.cancel_active_tool().expect("tool was active");

        assert_eq!(report.removed.len(), 1);
        assert_eq!(scene_len(&session), 2);
        assert!(session.active_tool().is_none());
        assert!(session.toolbar_controls().is_none());
        assert!(session.pre_tool_snapshot().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn cancel_drops_actions_recorded_under_the_tool() {
        let mut session = loaded_session();
        session.add_edit_action(noop_action());
        session.set_active_state(Some(ActiveTool::Rotate)).expect("rotate");
        session.add_edit_action(noop_action());
        session.add_edit_action(noop_action());

        session.cancel_active_tool().expect("tool was active");

        assert_eq!(session.edit_history().len(), 1);
        assert_eq!(session.edit_history().cursor(), 0);
        assert!(!session.edit_history().can_redo());
    }

    #[test]
    fn failed_rollback_keeps_action_track() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Rotate)).expect("rotate");
        session.add_edit_action(noop_action());
        session.pre_tool_snapshot = Some(Snapshot::new("{ broken".to_string(), None));

        session.cancel_active_tool().expect("tool was active");

        assert_eq!(session.error(), Some(RESTORE_FAILED_MESSAGE));
        assert_eq!(session.edit_history().len(), 1);
        assert!(session.active_tool().is_none());
    }

    #[test]
    fn cleanup_failure_is_reported_but_not_surfaced() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Crop)).expect("crop");
        {
            let scene = session.scene_mut().expect("scene");
            let overlay = scene.add_node("cropOverlay", "Rect");
            scene.poison(overlay);
        }

        let report = session.cancel_active_tool().expect("tool was active");
        assert_eq!(report.failures.len(), 1);
        assert!(report.removed.is_empty());
        assert!(session.error().is_none());

        let scene = session.scene_mut().expect("scene");
        let stray = scene.add_node("tempNode", "Rect");
        scene.poison(stray);
        let report = session.cleanup_temp_nodes();
        assert_eq!(report.failures.len(), 1);
        assert!(session.error().is_none());
    }

    #[test]
    fn cancel_without_active_tool_is_noop() {
        let mut session = loaded_session();
        let redraws = session.scene().map(MemoryScene::redraw_count);
        assert!(session.cancel_active_tool().is_none());
        assert_eq!(session.scene().map(MemoryScene::redraw_count), redraws);
    }

    #[test]
    fn apply_keeps_changes_and_pushes_snapshot() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Watermark)).expect("watermark");
        {
            let scene = session.scene_mut().expect("scene");
            scene.add_node("watermark", "Text");
            scene.add_node("watermarkTransformer", "Transformer");
        }

        let report = session
            .apply_active_tool()
            .expect("apply")
            .expect("tool was active");

        assert_eq!(report.removed.len(), 1);
        assert_eq!(scene_len(&session), 3);
        assert_eq!(session.state_history().len(), 2);
        let latest = session.state_history().current().expect("current");
        assert_eq!(latest.tool, Some(ActiveTool::Watermark));
        assert!(session.active_tool().is_none());
    }

    #[test]
    fn restore_failure_sets_banner() {
        let mut session = loaded_session();
        let broken = Snapshot::new("{ broken".to_string(), None);
        let result = session.restore_snapshot(&broken);
        assert!(matches!(result, Err(AppError::Restore(_))));
        assert_eq!(session.error(), Some(RESTORE_FAILED_MESSAGE));
    }

    #[test]
    fn snapshot_track_walks_back_and_forth() {
        let mut session = loaded_session();
        session.take_snapshot().expect("s1");
        session.take_snapshot().expect("s2");
        assert_eq!(session.state_history().cursor(), 2);

        let peeked = session.undo_state(true);
        assert!(peeked.is_some());
        assert_eq!(session.state_history().cursor(), 2);

        assert!(session.undo_state(false).is_some());
        assert_eq!(session.state_history().cursor(), 1);
        assert!(session.redo_state().is_some());
        assert_eq!(session.state_history().cursor(), 2);
        assert!(session.redo_state().is_none());
    }

    #[test]
    fn restore_previous_and_next_state_move_cursor_on_success() {
        let mut session = loaded_session();
        session
            .scene_mut()
            .expect("scene")
            .add_node("annotation", "Arrow");
        session.take_snapshot().expect("s1");

        assert!(session.restore_previous_state().expect("back").is_some());
        assert_eq!(session.state_history().cursor(), 0);
        assert_eq!(scene_len(&session), 2);

        assert!(session.restore_next_state().expect("forward").is_some());
        assert_eq!(session.state_history().cursor(), 1);
        assert_eq!(scene_len(&session), 3);
        assert!(session.restore_next_state().expect("at end").is_none());
    }

    #[test]
    fn failed_state_restore_leaves_cursor_in_place() {
        let mut session = loaded_session();
        session
            .state_history
            .push(Snapshot::new("{ broken".to_string(), None));
        assert!(session.restore_previous_state().expect("back to base").is_some());
        assert_eq!(session.state_history().cursor(), 0);

        let forward = session.restore_next_state();
        assert!(matches!(forward, Err(AppError::Restore(_))));
        assert_eq!(session.state_history().cursor(), 0);
        assert_eq!(session.error(), Some(RESTORE_FAILED_MESSAGE));

        session.state_history.clear();
        session
            .state_history
            .push(Snapshot::new("{ broken".to_string(), None));
        session.take_snapshot().expect("good");
        let back = session.restore_previous_state();
        assert!(matches!(back, Err(AppError::Restore(_))));
        assert_eq!(session.state_history().cursor(), 1);
    }

    #[test]
    fn action_track_drives_scene() {
        let mut session = loaded_session();
        let image = session.image_node().expect("image node");
        session
            .scene_mut()
            .expect("scene")
            .set_attr(image, "rotation", serde_json::json!(90))
            .expect("rotate");
        session.add_edit_action(EditAction::new(
            "rotate 90",
            move |s: &mut MemoryScene| {
                let _ = s.set_attr(image, "rotation", serde_json::json!(0));
            },
            move |s: &mut MemoryScene| {
                let _ = s.set_attr(image, "rotation", serde_json::json!(90));
            },
        ));

        assert!(session.undo());
        let rotation = session.scene().and_then(|s| s.attr(image, "rotation")).cloned();
        assert_eq!(rotation, Some(serde_json::json!(0)));

        assert!(session.redo());
        let rotation = session.scene().and_then(|s| s.attr(image, "rotation")).cloned();
        assert_eq!(rotation, Some(serde_json::json!(90)));
        assert!(!session.redo());
    }

    #[test]
    fn undo_without_scene_returns_false() {
        let mut session: EditSession<MemoryScene> = EditSession::new();
        session.add_edit_action(noop_action());
        assert!(!session.undo());
        assert_eq!(session.edit_history().cursor(), 0);
    }

    #[test]
    fn toolbar_controls_must_match_active_tool() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Rotate)).expect("rotate");

        let ok = session.set_toolbar_controls(ToolbarControls::Rotate { angle: 45.0 });
        assert!(ok.is_ok());
        let mismatch =
            session.set_toolbar_controls(ToolbarControls::defaults_for(ActiveTool::Crop));
        assert!(matches!(mismatch, Err(AppError::InvalidInput(_))));
        assert_eq!(
            session.toolbar_controls(),
            Some(&ToolbarControls::Rotate { angle: 45.0 })
        );
    }

    #[test]
    fn cleanup_temp_nodes_spares_permanent_nodes() {
        let mut session = loaded_session();
        {
            let scene = session.scene_mut().expect("scene");
            scene.add_node("annotationTransformer", "Transformer");
            scene.add_node("focalCrosshair", "Circle");
            scene.add_node("tempNode", "Rect");
        }
        let report = session.cleanup_temp_nodes();
        assert_eq!(report.removed.len(), 2);
        assert_eq!(scene_len(&session), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = loaded_session();
        session.set_active_state(Some(ActiveTool::Crop)).expect("crop");
        session.set_error("boom");
        session.add_edit_action(noop_action());

        session.reset();

        assert!(session.file().is_none());
        assert!(session.scene().is_none());
        assert!(session.image_node().is_none());
        assert!(session.active_tool().is_none());
        assert!(session.pre_tool_snapshot().is_none());
        assert!(session.edit_history().is_empty());
        assert!(session.state_history().is_empty());
        assert!(session.error().is_none());
    }
}

//! The two undo tracks of an edit session.
//!
//! * [`EditHistory`]: fine-grained, action-based. Each entry is a pair of
//!   closures that reverse and replay one edit against the scene.
//! * [`StateHistory`]: coarse-grained, snapshot-based. Each entry is the
//!   whole scene serialized to JSON.
//!
//! Both are linear: recording a new entry after stepping back discards the
//! redo branch. Both expose their cursor as an index in `[-1, len-1]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ActiveTool;

/// Default number of entries kept per history track.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

pub type ActionFn<S> = Box<dyn FnMut(&mut S) + Send>;

/// A reversible edit: `undo` reverts it, `redo` applies it again.
pub struct EditAction<S> {
    label: String,
    undo: ActionFn<S>,
    redo: ActionFn<S>,
}

impl<S> EditAction<S> {
    pub fn new<U, R>(label: impl Into<String>, undo: U, redo: R) -> Self
    where
        U: FnMut(&mut S) + Send + 'static,
        R: FnMut(&mut S) + Send + 'static,
    {
        Self {
            label: label.into(),
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<S> std::fmt::Debug for EditAction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Linear stack of [`EditAction`]s.
#[derive(Debug)]
pub struct EditHistory<S> {
    actions: Vec<EditAction<S>>,
    /// Number of actions currently applied; `actions[..applied]` is the undo
    /// side, `actions[applied..]` the redo side.
    applied: usize,
    /// Actions dropped from the front by the limit; keeps checkpoints stable.
    evicted: usize,
    limit: Option<usize>,
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::with_limit(Some(DEFAULT_HISTORY_LIMIT))
    }
}

impl<S> EditHistory<S> {
    /// `None` keeps every action.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            evicted: 0,
            limit,
        }
    }

    /// Record an action that has already been applied to the scene.
    ///
    /// Any undone actions beyond the cursor are discarded first.
    pub fn add(&mut self, action: EditAction<S>) {
        self.actions.truncate(self.applied);
        self.actions.push(action);
        self.applied = self.actions.len();
        if let Some(limit) = self.limit {
            while self.actions.len() > limit.max(1) {
                self.actions.remove(0);
                self.applied -= 1;
                self.evicted += 1;
            }
        }
    }

    /// Revert the most recent applied action. Returns `false` at the start of
    /// history.
    pub fn undo(&mut self, scene: &mut S) -> bool {
        if self.applied == 0 {
            return false;
        }
        self.applied -= 1;
        let action = &mut self.actions[self.applied];
        tracing::debug!(action = %action.label, "undo edit action");
        (action.undo)(scene);
        true
    }

    /// Re-apply the next undone action. Returns `false` at the end of history.
    pub fn redo(&mut self, scene: &mut S) -> bool {
        if self.applied >= self.actions.len() {
            return false;
        }
        let action = &mut self.actions[self.applied];
        tracing::debug!(action = %action.label, "redo edit action");
        (action.redo)(scene);
        self.applied += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Index of the last applied action, `-1` when none is applied.
    pub fn cursor(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Labels of all recorded actions, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.label.clone()).collect()
    }

    /// Position of the cursor that survives eviction, for
    /// [`EditHistory::truncate_to`].
    pub fn checkpoint(&self) -> usize {
        self.evicted + self.applied
    }

    /// Drop every action recorded after `checkpoint` and treat the ones
    /// before it as applied. Used when the scene itself was rolled back to
    /// the state it had at `checkpoint`.
    pub fn truncate_to(&mut self, checkpoint: usize) {
        let keep = checkpoint
            .saturating_sub(self.evicted)
            .min(self.actions.len());
        self.actions.truncate(keep);
        self.applied = keep;
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
        self.evicted = 0;
    }
}

/// Whole-scene state captured at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Scene serialized by [`crate::scene::SceneGraph::serialize`].
    pub json: String,
    /// Tool that was active when the snapshot was taken.
    pub tool: Option<ActiveTool>,
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(json: String, tool: Option<ActiveTool>) -> Self {
        Self {
            json,
            tool,
            taken_at: Utc::now(),
        }
    }
}

/// Linear stack of [`Snapshot`]s with a movable cursor.
#[derive(Debug, Clone)]
pub struct StateHistory {
    snapshots: Vec<Snapshot>,
    /// `None` only while the history is empty.
    position: Option<usize>,
    limit: Option<usize>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_limit(Some(DEFAULT_HISTORY_LIMIT))
    }
}

impl StateHistory {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            snapshots: Vec::new(),
            position: None,
            limit,
        }
    }

    /// Append a snapshot after the cursor, discarding the redo branch.
    pub fn push(&mut self, snapshot: Snapshot) {
        let keep = self.position.map_or(0, |i| i + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);
        let mut position = self.snapshots.len() - 1;
        if let Some(limit) = self.limit {
            while self.snapshots.len() > limit.max(1) {
                self.snapshots.remove(0);
                position -= 1;
            }
        }
        self.position = Some(position);
    }

    /// The snapshot one step back from the cursor.
    ///
    /// With `peek` the cursor stays put. Returns `None` when the cursor is
    /// already at the earliest snapshot (or the history is empty); the cursor
    /// is not moved in that case.
    pub fn undo(&mut self, peek: bool) -> Option<&Snapshot> {
        match self.position {
            Some(i) if i > 0 => {
                if !peek {
                    self.position = Some(i - 1);
                }
                self.snapshots.get(i - 1)
            }
            _ => None,
        }
    }

    /// The snapshot one step forward, without moving the cursor.
    pub fn peek_redo(&self) -> Option<&Snapshot> {
        match self.position {
            Some(i) => self.snapshots.get(i + 1),
            None => None,
        }
    }

    /// Move the cursor one step forward and return that snapshot, or `None`
    /// at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        match self.position {
            Some(i) if i + 1 < self.snapshots.len() => {
                self.position = Some(i + 1);
                self.snapshots.get(i + 1)
            }
            _ => None,
        }
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.position.and_then(|i| self.snapshots.get(i))
    }

    /// Cursor index, `-1` when empty.
    pub fn cursor(&self) -> isize {
        self.position.map_or(-1, |i| i as isize)
    }

    pub fn can_undo(&self) -> bool {
        self.position.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.position
            .is_some_and(|i| i + 1 < self.snapshots.len())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.position = None;
    }
}

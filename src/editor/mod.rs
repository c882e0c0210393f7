//! Image-edit session: tool lifecycle, two-track undo/redo, and cleanup of
//! transient tool UI.
//!
//! - [`session`]: [`EditSession`], the per-dialog coordinator
//! - [`history`]: action-based and snapshot-based undo tracks
//! - [`cleanup`]: selector-driven removal of helper nodes
//! - [`debounce`]: quiet-period scheduling for cache refreshes

pub mod cleanup;
pub mod debounce;
pub mod history;
pub mod session;

pub use cleanup::{CleanupFailure, CleanupReport};
pub use debounce::Debouncer;
pub use history::{EditAction, EditHistory, Snapshot, StateHistory};
pub use session::EditSession;

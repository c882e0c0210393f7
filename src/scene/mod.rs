//! Scene graph capability interface.
//!
//! The edit session never talks to a concrete canvas library. Everything it
//! needs from the retained scene graph is expressed by [`SceneGraph`]:
//!
//! ```text
//! scene/
//! ├── mod.rs: SceneGraph trait, node identifiers, SceneError
//! └── memory.rs: MemoryScene, an in-process implementation
//! ```
//!
//! A browser front-end implements the trait over its canvas library; the CLI
//! and the test suite use [`MemoryScene`].

pub mod memory;

pub use memory::MemoryScene;

use serde::{Deserialize, Serialize};

/// Stable identifier of a node inside one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selector used to look nodes up, matching either the node name or its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Matches the node's `name` attribute exactly.
    Name(String),
    /// Matches the node's class (`"Transformer"`, `"Rect"`, `"Image"`, ...).
    Class(String),
}

impl Tag {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Returns `true` when `node` is selected by this tag.
    pub fn matches(&self, node: &NodeInfo) -> bool {
        match self {
            Self::Name(name) => node.name == *name,
            Self::Class(class) => node.class == *class,
        }
    }
}

/// Read-only view of a node, enough to decide whether cleanup may remove it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub class: String,
}

/// Failures reported by a scene graph implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("cannot destroy node {id}: {message}")]
    Destroy { id: NodeId, message: String },
    #[error("scene serialization failed: {0}")]
    Serialize(String),
    #[error("scene restore failed: {0}")]
    Restore(String),
}

/// Minimal capability set the edit session requires from a scene graph.
pub trait SceneGraph {
    /// Serialize the whole scene to JSON.
    fn serialize(&self) -> Result<String, SceneError>;

    /// Replace the scene contents with a previously serialized state.
    fn restore(&mut self, json: &str) -> Result<(), SceneError>;

    /// All nodes matching `tag`, in scene order.
    fn find_by_tag(&self, tag: &Tag) -> Vec<NodeId>;

    fn node(&self, id: NodeId) -> Option<NodeInfo>;

    /// Remove a node from the scene.
    fn destroy(&mut self, id: NodeId) -> Result<(), SceneError>;

    /// Schedule a redraw after structural changes.
    fn redraw(&mut self);
}

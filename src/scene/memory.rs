//! In-process scene graph.
//!
//! [`MemoryScene`] keeps a flat, ordered list of nodes. Each node has a name,
//! a class, and free-form JSON attributes (position, size, filter values...).
//! Serialization is plain `serde_json`, so snapshots are human-readable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{NodeId, NodeInfo, SceneError, SceneGraph, Tag};

/// A single drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

/// On-disk / snapshot shape of a [`MemoryScene`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDocument {
    next_id: u64,
    nodes: Vec<SceneNode>,
}

#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: Vec<SceneNode>,
    next_id: u64,
    redraws: usize,
    /// Node ids whose destruction is forced to fail.
    poisoned: HashSet<NodeId>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its freshly allocated id.
    pub fn add_node(&mut self, name: &str, class: &str) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push(SceneNode {
            id,
            name: name.to_string(),
            class: class.to_string(),
            attrs: Map::new(),
        });
        id
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: Value) -> Result<(), SceneError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.attrs.insert(key.to_string(), value);
        Ok(())
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.attrs.get(key))
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of redraws requested since construction.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Make every future `destroy(id)` call fail. Used to exercise the
    /// best-effort cleanup paths.
    pub fn poison(&mut self, id: NodeId) {
        self.poisoned.insert(id);
    }
}

impl SceneGraph for MemoryScene {
    fn serialize(&self) -> Result<String, SceneError> {
        let doc = SceneDocument {
            next_id: self.next_id,
            nodes: self.nodes.clone(),
        };
        serde_json::to_string(&doc).map_err(|e| SceneError::Serialize(e.to_string()))
    }

    fn restore(&mut self, json: &str) -> Result<(), SceneError> {
        let doc: SceneDocument =
            serde_json::from_str(json).map_err(|e| SceneError::Restore(e.to_string()))?;
        self.nodes = doc.nodes;
        // Never hand out an id that already exists in the restored scene.
        let max_id = self.nodes.iter().map(|n| n.id.0).max().unwrap_or(0);
        self.next_id = doc.next_id.max(max_id);
        self.redraws += 1;
        Ok(())
    }

    fn find_by_tag(&self, tag: &Tag) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| {
                tag.matches(&NodeInfo {
                    id: n.id,
                    name: n.name.clone(),
                    class: n.class.clone(),
                })
            })
            .map(|n| n.id)
            .collect()
    }

    fn node(&self, id: NodeId) -> Option<NodeInfo> {
        self.nodes.iter().find(|n| n.id == id).map(|n| NodeInfo {
            id: n.id,
            name: n.name.clone(),
            class: n.class.clone(),
        })
    }

    fn destroy(&mut self, id: NodeId) -> Result<(), SceneError> {
        if self.poisoned.contains(&id) {
            return Err(SceneError::Destroy {
                id,
                message: "node is locked".to_string(),
            });
        }
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return Err(SceneError::NodeNotFound(id));
        }
        Ok(())
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_allocates_increasing_ids() {
        let mut scene = MemoryScene::new();
        let a = scene.add_node("image", "Image");
        let b = scene.add_node("cropOverlay", "Rect");
        assert!(b > a);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn find_by_tag_returns_matches_in_scene_order() {
        let mut scene = MemoryScene::new();
        let t1 = scene.add_node("cropTransformer", "Transformer");
        scene.add_node("image", "Image");
        let t2 = scene.add_node("annotationTransformer", "Transformer");

        assert_eq!(scene.find_by_tag(&Tag::class("Transformer")), vec![t1, t2]);
        assert_eq!(scene.find_by_tag(&Tag::name("image")).len(), 1);
        assert!(scene.find_by_tag(&Tag::name("missing")).is_empty());
    }

    #[test]
    fn serialize_then_restore_brings_back_removed_nodes() {
        let mut scene = MemoryScene::new();
        let image = scene.add_node("image", "Image");
        scene
            .set_attr(image, "rotation", serde_json::json!(90))
            .expect("set attr");
        let overlay = scene.add_node("cropOverlay", "Rect");
        let saved = scene.serialize().expect("serialize");

        scene.destroy(overlay).expect("destroy overlay");
        assert_eq!(scene.len(), 1);

        scene.restore(&saved).expect("restore");
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.attr(image, "rotation"), Some(&serde_json::json!(90)));
    }

    #[test]
    fn ids_stay_unique_after_restore() {
        let mut scene = MemoryScene::new();
        scene.add_node("image", "Image");
        let saved = scene.serialize().expect("serialize");
        scene.restore(&saved).expect("restore");
        let fresh = scene.add_node("blurRegion", "Rect");
        assert_eq!(fresh, NodeId(2));
    }

    #[test]
    fn restore_rejects_garbage() {
        let mut scene = MemoryScene::new();
        let result = scene.restore("{not json");
        assert!(matches!(result, Err(SceneError::Restore(_))));
    }

    #[test]
    fn destroy_missing_node_is_not_found() {
        let mut scene = MemoryScene::new();
        let result = scene.destroy(NodeId(7));
        assert_eq!(result, Err(SceneError::NodeNotFound(NodeId(7))));
    }

    #[test]
    fn poisoned_node_refuses_destruction() {
        let mut scene = MemoryScene::new();
        let id = scene.add_node("blurRegion", "Rect");
        scene.poison(id);
        assert!(matches!(scene.destroy(id), Err(SceneError::Destroy { .. })));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn set_attr_on_missing_node_fails() {
        let mut scene = MemoryScene::new();
        let result = scene.set_attr(NodeId(3), "x", serde_json::json!(1));
        assert_eq!(result, Err(SceneError::NodeNotFound(NodeId(3))));
    }
}

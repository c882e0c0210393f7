//! Removal of transient tool UI from the scene.
//!
//! Tools draw helper nodes (crop masks, blur regions, transform handles)
//! that must not survive a tool switch. They are found by fixed name/class
//! selectors. Nodes listed in [`PERMANENT_NAMES`] are never removed here.
//!
//! Removal is best-effort: each node is destroyed independently and failures
//! are collected into the [`CleanupReport`] instead of aborting the sweep.

use serde::Serialize;

use crate::models::ActiveTool;
use crate::scene::{NodeId, SceneError, SceneGraph, Tag};

/// Node names that belong to the edited image itself.
pub const PERMANENT_NAMES: &[&str] = &["annotationTransformer", "annotation", "watermark"];

/// Helper names any tool may leave behind.
const COMMON_TEMP_NAMES: &[&str] = &["tempNode", "selectionRect"];

const TRANSFORMER_CLASS: &str = "Transformer";

fn tool_temp_names(tool: ActiveTool) -> &'static [&'static str] {
    match tool {
        ActiveTool::Crop => &[
            "cropTool",
            "cropOverlay",
            "cropMask",
            "cropTransformer",
            "cropGrid",
        ],
        ActiveTool::Blur => &["blurRegion", "blurTransformer", "mosaicRect", "blurPreview"],
        ActiveTool::Rotate => &["rotateGuide", "rotateGrid"],
        ActiveTool::Watermark => &[
            "watermarkTransformer",
            "watermarkHandle",
            "watermarkPreview",
        ],
        ActiveTool::Annotate => &["annotationDraft"],
        ActiveTool::FocalPoint => &["focalPoint", "focalCrosshair"],
        ActiveTool::FineTune => &["fineTunePreview"],
    }
}

/// Selectors for every transient node, regardless of tool.
pub fn temp_selectors() -> Vec<Tag> {
    let mut tags = vec![Tag::class(TRANSFORMER_CLASS)];
    tags.extend(COMMON_TEMP_NAMES.iter().map(|n| Tag::name(*n)));
    for tool in ActiveTool::ALL {
        tags.extend(tool_temp_names(tool).iter().map(|n| Tag::name(*n)));
    }
    tags
}

/// Selectors for the helpers drawn by `tool`.
pub fn tool_selectors(tool: ActiveTool) -> Vec<Tag> {
    let mut tags: Vec<Tag> = tool_temp_names(tool).iter().map(|n| Tag::name(*n)).collect();
    tags.push(Tag::class(TRANSFORMER_CLASS));
    tags.extend(COMMON_TEMP_NAMES.iter().map(|n| Tag::name(*n)));
    tags
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupFailure {
    pub node: NodeId,
    pub message: String,
}

/// Outcome of a cleanup sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub removed: Vec<NodeId>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Destroy every node matched by `selectors`, except permanent ones, then
/// request a redraw.
pub fn remove_matching<S: SceneGraph + ?Sized>(scene: &mut S, selectors: &[Tag]) -> CleanupReport {
    let mut targets: Vec<NodeId> = Vec::new();
    for tag in selectors {
        for id in scene.find_by_tag(tag) {
            if !targets.contains(&id) {
                targets.push(id);
            }
        }
    }

    let mut report = CleanupReport::default();
    for id in targets {
        let permanent = scene
            .node(id)
            .is_some_and(|n| PERMANENT_NAMES.contains(&n.name.as_str()));
        if permanent {
            continue;
        }
        match scene.destroy(id) {
            Ok(()) => report.removed.push(id),
            // Already gone (e.g. destroyed together with its parent).
            Err(SceneError::NodeNotFound(_)) => {}
            Err(e) => {
                tracing::warn!(node = %id, error = %e, "failed to remove temporary node");
                report.failures.push(CleanupFailure {
                    node: id,
                    message: e.to_string(),
                });
            }
        }
    }

    scene.redraw();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    #[test]
    fn temp_sweep_keeps_image_and_permanent_transformer() {
        let mut scene = MemoryScene::new();
        let image = scene.add_node("image", "Image");
        let keep = scene.add_node("annotationTransformer", "Transformer");
        scene.add_node("cropTransformer", "Transformer");
        scene.add_node("blurRegion", "Rect");
        scene.add_node("selectionRect", "Rect");

        let report = remove_matching(&mut scene, &temp_selectors());

        assert_eq!(report.removed.len(), 3);
        assert!(report.is_clean());
        let left: Vec<NodeId> = scene.nodes().iter().map(|n| n.id).collect();
        assert_eq!(left, vec![image, keep]);
    }

    #[test]
    fn node_matched_by_two_selectors_is_destroyed_once() {
        let mut scene = MemoryScene::new();
        scene.add_node("cropTransformer", "Transformer");
        let report = remove_matching(&mut scene, &temp_selectors());
        assert_eq!(report.removed.len(), 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn tool_sweep_only_touches_that_tools_helpers() {
        let mut scene = MemoryScene::new();
        scene.add_node("cropOverlay", "Rect");
        let blur = scene.add_node("blurRegion", "Rect");

        let report = remove_matching(&mut scene, &tool_selectors(ActiveTool::Crop));

        assert_eq!(report.removed.len(), 1);
        assert_eq!(scene.len(), 1);
        assert!(scene.node(blur).is_some());
    }

    #[test]
    fn one_failed_destroy_does_not_stop_the_sweep() {
        let mut scene = MemoryScene::new();
        let stuck = scene.add_node("cropOverlay", "Rect");
        scene.add_node("cropMask", "Rect");
        scene.add_node("cropGrid", "Line");
        scene.poison(stuck);

        let report = remove_matching(&mut scene, &tool_selectors(ActiveTool::Crop));

        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].node, stuck);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn sweep_requests_redraw() {
        let mut scene = MemoryScene::new();
        let before = scene.redraw_count();
        remove_matching(&mut scene, &temp_selectors());
        assert_eq!(scene.redraw_count(), before + 1);
    }
}

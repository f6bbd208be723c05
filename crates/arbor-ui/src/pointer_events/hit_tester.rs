use arbor_core::{ElementId, Position};
use glam::Vec2;

use crate::pointer_events::HitTestMode;
use crate::tree::ElementTree;

/// Responders under `point`, frontmost first.
///
/// Elements are collected back to front, honoring clips and layer
/// transforms. The hits are then walked front to back, each element's
/// [`HitTestMode`] deciding which of the elements behind it are still
/// considered.
pub(crate) fn hit_test(tree: &ElementTree, root: ElementId, point: Position) -> Vec<ElementId> {
    let mut hits = Vec::new();
    collect_hits(tree, root, point, &mut hits);

    let mut responders = Vec::new();
    let mut passed_from: Option<ElementId> = None;
    for &(id, mode) in hits.iter().rev() {
        if let Some(descendant) = passed_from {
            if !tree.is_ancestor(id, descendant) {
                continue;
            }
            passed_from = None;
        }
        let is_responder = tree
            .get(id)
            .and_then(|node| node.kind.as_ref())
            .is_some_and(|kind| kind.as_responder().is_some());
        if is_responder {
            responders.push(id);
        }
        match mode {
            HitTestMode::PassThrough | HitTestMode::Disabled => {}
            HitTestMode::PassToParent => passed_from = Some(id),
            HitTestMode::Absorb => break,
        }
    }
    responders
}

/// `point` is in the coordinates of the element's parent.
fn collect_hits(
    tree: &ElementTree,
    id: ElementId,
    point: Position,
    hits: &mut Vec<(ElementId, HitTestMode)>,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let Some(kind) = node.kind.as_ref() else {
        return;
    };
    let mut local = point - node.rel_position;
    if let Some(clip) = &node.clip {
        if !clip.contains(local) {
            return;
        }
    }
    if let Some(layer) = kind.as_layer() {
        if layer.transform.matrix2.determinant() == 0.0 {
            return;
        }
        let inverse = layer.transform.inverse();
        let transformed = inverse.transform_point2(Vec2::new(local.left, local.top));
        local = Position::new(transformed.x, transformed.y);
    }
    let mode = kind.hit_test_mode();
    if mode != HitTestMode::Disabled && node.size.contains(local.left, local.top) {
        hits.push((id, mode));
    }
    for &child in &node.children {
        collect_hits(tree, child, local, hits);
    }
}

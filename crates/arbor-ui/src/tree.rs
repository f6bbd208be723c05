//! Element storage.
//!
//! Elements live in a slot arena addressed by generational [`ElementId`]s.
//! Parents own their children through the `children` list; the `parent`
//! back-reference is a plain handle used for traversal only.

use arbor_core::{BoxConstraints, ElementId, Position, Size};
use arbor_paint::{ClipPath, PaintCache};
use smallvec::SmallVec;

use crate::element::ElementKind;

pub(crate) type Children = SmallVec<[ElementId; 4]>;

/// One element and the layout state the document keeps for it.
#[derive(Debug)]
pub(crate) struct ElementNode {
    /// `None` only while the document is running this element's layout or paint
    pub(crate) kind: Option<ElementKind>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Children,
    pub(crate) size: Size,
    /// Relative to the parent
    pub(crate) rel_position: Position,
    pub(crate) abs_position: Position,
    /// Applied to this element and its subtree, in this element's coordinates
    pub(crate) clip: Option<ClipPath>,
    pub(crate) is_relayout_boundary: bool,
    pub(crate) is_changed: bool,
    pub(crate) prev_constraints: Option<BoxConstraints>,
    /// Present exactly when the element is a repaint boundary
    pub(crate) paint_cache: Option<PaintCache>,
}

impl ElementNode {
    pub(crate) fn new(kind: ElementKind) -> Self {
        let paint_cache = kind.is_repaint_boundary_by_default().then(PaintCache::new);
        Self {
            kind: Some(kind),
            parent: None,
            children: Children::new(),
            size: Size::ZERO,
            rel_position: Position::ZERO,
            abs_position: Position::ZERO,
            clip: None,
            is_relayout_boundary: false,
            is_changed: false,
            prev_constraints: None,
            paint_cache,
        }
    }

    pub(crate) fn is_repaint_boundary(&self) -> bool {
        self.paint_cache.is_some()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<ElementNode>,
}

#[derive(Debug, Default)]
pub(crate) struct ElementTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
}

impl ElementTree {
    pub(crate) fn insert(&mut self, node: ElementNode) -> ElementId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return ElementId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, node: Some(node) });
        ElementId::new(index, 0)
    }

    /// Free the slot. The generation is bumped so the old handle goes stale.
    pub(crate) fn remove(&mut self, id: ElementId) -> Option<ElementNode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
        self.len -= 1;
        Some(node)
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&ElementNode> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// True if `ancestor` is a strict ancestor of `descendant`.
    pub(crate) fn is_ancestor(&self, ancestor: ElementId, descendant: ElementId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All ids in the subtree rooted at `id`, parents before children.
    pub(crate) fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            result.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Stack;

    fn node() -> ElementNode {
        ElementNode::new(ElementKind::Stack(Stack::new()))
    }

    #[test]
    fn test_slot_reuse_invalidates_old_handle() {
        let mut tree = ElementTree::default();
        let a = tree.insert(node());
        assert!(tree.remove(a).is_some());
        let b = tree.insert(node());
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(tree.get(a).is_none());
        assert!(tree.get(b).is_some());
        assert!(tree.remove(a).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_ancestry_and_subtree_order() {
        let mut tree = ElementTree::default();
        let root = tree.insert(node());
        let a = tree.insert(node());
        let b = tree.insert(node());
        let c = tree.insert(node());
        for (parent, child) in [(root, a), (root, b), (a, c)] {
            tree.get_mut(parent).unwrap().children.push(child);
            tree.get_mut(child).unwrap().parent = Some(parent);
        }
        assert!(tree.is_ancestor(root, c));
        assert!(tree.is_ancestor(a, c));
        assert!(!tree.is_ancestor(b, c));
        assert!(!tree.is_ancestor(c, c));
        assert_eq!(tree.subtree(root), vec![root, a, c, b]);
    }
}

//! The document: element arena, frame pipeline and input dispatch.
//!
//! A frame is a relayout followed by a paint. Relayout only revisits the
//! relayout boundaries enclosing elements passed to [`Document::change`];
//! paint traverses the whole tree, but repaint boundaries that did not
//! change replay their cached pictures instead of running their painters.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use arbor_core::{
    BoxConstraints, ElementId, KeyEvent, PointerEvent, Position, Result, ScrollEvent, Size,
    TreeError,
};
use arbor_paint::{Canvas, ClipPath, PaintCache, Scene};
use arbor_text::{ApproximateTextBackend, ApproximateTextConfig, TextBackend};
use glam::{Affine2, Vec2};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, debug_span, trace, warn};

use crate::element::ElementKind;
use crate::options::{validate_viewport, DocumentOptions};
use crate::pointer_events::{hit_test, PointerEventManager};
use crate::signal::{dispatch, Handler, Signal, SubscriptionToken, TokenSource};
use crate::tree::{Children, ElementNode, ElementTree};

struct SizeObserver {
    id: ElementId,
    last: Option<Size>,
    callback: Box<dyn FnMut(Size)>,
}

/// A tree of elements and everything needed to lay it out, paint it and
/// route input to it.
pub struct Document {
    options: DocumentOptions,
    backend: Rc<dyn TextBackend>,
    tree: ElementTree,
    root: Option<ElementId>,
    /// Elements passed to `change` since the last relayout
    changed: IndexSet<ElementId>,
    /// Repaint boundaries to re-record on the next paint
    repaint: IndexSet<ElementId>,
    need_layout: bool,
    need_recompose: bool,
    scene: Scene,
    /// Enclosing repaint boundaries during paint, with their absolute origin
    boundaries: Vec<(ElementId, Position)>,
    /// Whether an ancestor of the element being painted changed
    painting_changed: bool,
    tokens: TokenSource,
    size_observers: IndexMap<SubscriptionToken, SizeObserver>,
    pointer_events: PointerEventManager,
    key_signal: Signal<Document, KeyEvent>,
    scroll_signal: Signal<Document, ScrollEvent>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("options", &self.options)
            .field("root", &self.root)
            .field("elements", &self.tree.len())
            .field("changed", &self.changed)
            .field("need_layout", &self.need_layout)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new(options: DocumentOptions, backend: Rc<dyn TextBackend>) -> Result<Self> {
        options.validate()?;
        let scene = Scene::new(options.viewport);
        Ok(Self {
            options,
            backend,
            tree: ElementTree::default(),
            root: None,
            changed: IndexSet::new(),
            repaint: IndexSet::new(),
            need_layout: false,
            need_recompose: false,
            scene,
            boundaries: Vec::new(),
            painting_changed: false,
            tokens: TokenSource::default(),
            size_observers: IndexMap::new(),
            pointer_events: PointerEventManager::new(),
            key_signal: Signal::new(),
            scroll_signal: Signal::new(),
        })
    }

    /// A document with default options measuring text with
    /// [`ApproximateTextBackend`].
    pub fn with_defaults() -> Result<Self> {
        let backend = ApproximateTextBackend::new(ApproximateTextConfig::default())?;
        Self::new(DocumentOptions::default(), Rc::new(backend))
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn text_backend(&self) -> Rc<dyn TextBackend> {
        Rc::clone(&self.backend)
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Commands of the last painted frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    // Tree mutation

    /// Create a detached element.
    pub fn create(&mut self, kind: impl Into<ElementKind>) -> ElementId {
        self.tree.insert(ElementNode::new(kind.into()))
    }

    /// Create an element and attach `child` to it.
    pub fn create_with_child(
        &mut self,
        kind: impl Into<ElementKind>,
        child: ElementId,
    ) -> Result<ElementId> {
        let id = self.create(kind);
        if let Err(err) = self.append_child(id, child) {
            self.tree.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Make `id` the root. The previous root and its subtree are destroyed.
    pub fn set_root(&mut self, id: ElementId) -> Result<()> {
        let node = self.node(id)?;
        if let Some(parent) = node.parent {
            return Err(TreeError::AlreadyAttached { child: id, parent }.into());
        }
        if let Some(old) = self.root.filter(|old| *old != id) {
            self.free_subtree(old);
        }
        let node = self.node_mut(id)?;
        if node.paint_cache.is_none() {
            node.paint_cache = Some(PaintCache::new());
        }
        node.is_relayout_boundary = true;
        node.is_changed = true;
        self.root = Some(id);
        self.need_layout = true;
        debug!(root = %id, "set document root");
        Ok(())
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.refresh_relayout_boundary(parent);
        self.change(parent)
    }

    /// Attach `child` to `parent` in front of the existing child `before`.
    pub fn insert_before_child(
        &mut self,
        parent: ElementId,
        child: ElementId,
        before: ElementId,
    ) -> Result<()> {
        self.check_attach(parent, child)?;
        let index = self.child_index(parent, before)?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.refresh_relayout_boundary(parent);
        self.change(parent)
    }

    /// Detach `child` from `parent`. The child stays alive and can be
    /// attached again or destroyed.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        let index = self.child_index(parent, child)?;
        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        self.refresh_relayout_boundary(parent);
        self.change(parent)
    }

    /// Put `new` in place of `old` and destroy `old` with its subtree.
    pub fn replace_child(&mut self, parent: ElementId, old: ElementId, new: ElementId) -> Result<()> {
        let index = self.child_index(parent, old)?;
        if old != new {
            self.check_attach(parent, new)?;
        }
        self.node_mut(parent)?.children[index] = new;
        self.node_mut(new)?.parent = Some(parent);
        if old != new {
            self.free_subtree(old);
        }
        self.change(parent)
    }

    /// Detach the element if attached and free it with its whole subtree.
    pub fn destroy(&mut self, id: ElementId) -> Result<()> {
        let node = self.node(id)?;
        if let Some(parent) = node.parent {
            self.remove_child(parent, id)?;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.free_subtree(id);
        Ok(())
    }

    fn check_attach(&self, parent: ElementId, child: ElementId) -> Result<()> {
        self.node(parent)?;
        let node = self.node(child)?;
        if let Some(current) = node.parent {
            return Err(TreeError::AlreadyAttached { child, parent: current }.into());
        }
        if self.root == Some(child) {
            return Err(TreeError::IsRoot(child).into());
        }
        if child == parent || self.tree.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { ancestor: child, descendant: parent }.into());
        }
        Ok(())
    }

    fn child_index(&self, parent: ElementId, child: ElementId) -> Result<usize> {
        self.node(child)?;
        self.node(parent)?
            .children
            .iter()
            .position(|id| *id == child)
            .ok_or_else(|| TreeError::NotAChild { child, parent }.into())
    }

    fn free_subtree(&mut self, id: ElementId) {
        for element in self.tree.subtree(id) {
            self.tree.remove(element);
        }
    }

    // Read access

    pub fn parent_of(&self, id: ElementId) -> Result<Option<ElementId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children_of(&self, id: ElementId) -> Result<&[ElementId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn is_parent_of(&self, parent: ElementId, child: ElementId) -> bool {
        self.tree.parent(child) == Some(parent)
    }

    /// The element's variant. Fails for stale ids.
    pub fn element(&self, id: ElementId) -> Result<&ElementKind> {
        self.node(id)?
            .kind
            .as_ref()
            .ok_or_else(|| TreeError::StaleElement(id).into())
    }

    /// Mutable access to the element's variant. Call [`Document::change`]
    /// afterwards, or use [`Document::update`].
    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut ElementKind> {
        self.node_mut(id)?
            .kind
            .as_mut()
            .ok_or_else(|| TreeError::StaleElement(id).into())
    }

    /// Modify the element's variant and mark it changed.
    pub fn update<F>(&mut self, id: ElementId, f: F) -> Result<()>
    where
        F: FnOnce(&mut ElementKind),
    {
        f(self.element_mut(id)?);
        self.refresh_relayout_boundary(id);
        self.change(id)
    }

    pub fn size(&self, id: ElementId) -> Result<Size> {
        Ok(self.node(id)?.size)
    }

    pub fn rel_position(&self, id: ElementId) -> Result<Position> {
        Ok(self.node(id)?.rel_position)
    }

    pub fn abs_position(&self, id: ElementId) -> Result<Position> {
        Ok(self.node(id)?.abs_position)
    }

    pub fn clip_of(&self, id: ElementId) -> Option<&ClipPath> {
        self.tree.get(id).and_then(|node| node.clip.as_ref())
    }

    pub fn is_repaint_boundary(&self, id: ElementId) -> Result<bool> {
        Ok(self.node(id)?.is_repaint_boundary())
    }

    pub fn is_relayout_boundary(&self, id: ElementId) -> Result<bool> {
        Ok(self.node(id)?.is_relayout_boundary)
    }

    fn node(&self, id: ElementId) -> Result<&ElementNode> {
        self.tree.get(id).ok_or_else(|| TreeError::StaleElement(id).into())
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut ElementNode> {
        self.tree.get_mut(id).ok_or_else(|| TreeError::StaleElement(id).into())
    }

    // Change tracking

    /// Mark the element as needing layout and paint on the next frame.
    pub fn change(&mut self, id: ElementId) -> Result<()> {
        self.node(id)?;
        self.changed.insert(id);
        let boundary = self.nearest_repaint_boundary(id);
        self.repaint.insert(boundary);
        Ok(())
    }

    /// Give the element its own paint cache, or take it away. Layers and
    /// the root are always repaint boundaries.
    pub fn set_repaint_boundary(&mut self, id: ElementId, is_boundary: bool) -> Result<()> {
        let is_root = self.root == Some(id);
        let node = self.node_mut(id)?;
        let is_layer = node.kind.as_ref().is_some_and(|kind| kind.as_layer().is_some());
        if is_boundary == node.is_repaint_boundary() {
            return Ok(());
        }
        if !is_boundary && (is_layer || is_root) {
            warn!(element = %id, "layers and the root stay repaint boundaries");
            return Ok(());
        }
        node.paint_cache = is_boundary.then(PaintCache::new);
        node.is_changed = true;
        let boundary = self.nearest_repaint_boundary(id);
        self.repaint.insert(boundary);
        Ok(())
    }

    /// Change a layer's transform without repainting its content.
    pub fn set_layer_transform(&mut self, id: ElementId, transform: Affine2) -> Result<()> {
        let layer = self
            .element_mut(id)?
            .as_layer_mut()
            .ok_or(TreeError::NotALayer(id))?;
        layer.transform = transform;
        self.need_recompose = true;
        Ok(())
    }

    /// Change a layer's opacity without repainting its content.
    pub fn set_layer_opacity(&mut self, id: ElementId, opacity: f32) -> Result<()> {
        let layer = self
            .element_mut(id)?
            .as_layer_mut()
            .ok_or(TreeError::NotALayer(id))?;
        layer.opacity = opacity.clamp(0.0, 1.0);
        self.need_recompose = true;
        Ok(())
    }

    /// Resize the surface the root is laid out into.
    pub fn set_viewport(&mut self, viewport: Size) -> Result<()> {
        validate_viewport(viewport)?;
        self.options.viewport = viewport;
        self.need_layout = true;
        Ok(())
    }

    fn nearest_repaint_boundary(&self, id: ElementId) -> ElementId {
        let mut current = id;
        loop {
            let Some(node) = self.tree.get(current) else {
                return current;
            };
            if node.is_repaint_boundary() {
                return current;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    fn find_relayout_boundary(&self, id: ElementId) -> ElementId {
        let mut current = id;
        loop {
            let Some(node) = self.tree.get(current) else {
                return current;
            };
            if self.root == Some(current)
                || (node.is_relayout_boundary && node.prev_constraints.is_some())
            {
                return current;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Recompute whether the element can stay a relayout boundary after
    /// its variant or child count changed. Only ever clears the flag; the
    /// next layout of the element sets it again.
    fn refresh_relayout_boundary(&mut self, id: ElementId) {
        let is_root = self.root == Some(id);
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let Some(kind) = node.kind.as_ref() else {
            return;
        };
        let has_child = !node.children.is_empty();
        let still_boundary = is_root
            || node.prev_constraints.is_some_and(|c| c.is_tight())
            || kind.sized_by_constraints(has_child);
        if node.is_relayout_boundary && !still_boundary {
            trace!(element = %id, "no longer a relayout boundary");
            node.is_relayout_boundary = false;
        }
    }

    fn is_attached(&self, id: ElementId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        id == root || self.tree.is_ancestor(root, id)
    }

    // Frame pipeline

    /// Lay out what changed and paint a new frame into [`Document::scene`].
    ///
    /// Returns false, leaving the previous frame in place, when nothing
    /// changed since the last call.
    pub fn render(&mut self) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let laid_out = self.relayout();
        if !laid_out && self.repaint.is_empty() && !self.need_recompose {
            return false;
        }
        self.paint(root);
        true
    }

    /// Lay out pending changes without painting. Returns true if anything
    /// was laid out.
    pub fn relayout(&mut self) -> bool {
        let Some(root) = self.root else {
            self.changed.clear();
            return false;
        };
        let _span = debug_span!("relayout").entered();

        if self.need_layout {
            self.need_layout = false;
            self.changed.clear();
            self.relayout_boundaries(vec![root]);
            self.notify_size_observers();
            return true;
        }
        if self.changed.is_empty() {
            return false;
        }

        let changed = std::mem::take(&mut self.changed);
        let candidates: IndexSet<ElementId> = changed
            .into_iter()
            .filter(|id| self.is_attached(*id))
            .map(|id| self.find_relayout_boundary(id))
            .collect();
        let boundaries: Vec<ElementId> = candidates
            .iter()
            .copied()
            .filter(|id| !candidates.iter().any(|other| self.tree.is_ancestor(*other, *id)))
            .collect();
        debug!(boundaries = boundaries.len(), "relayout boundaries");
        let laid_out = !boundaries.is_empty();
        self.relayout_boundaries(boundaries);
        self.notify_size_observers();
        laid_out
    }

    /// Lay out the relayout boundary enclosing `id` right away.
    pub fn partial_relayout(&mut self, id: ElementId) -> Result<()> {
        self.node(id)?;
        let boundary = self.find_relayout_boundary(id);
        self.relayout_boundaries(vec![boundary]);
        self.notify_size_observers();
        Ok(())
    }

    /// Lay out an element that need not be attached, as if it were a
    /// relayout boundary given `constraints`.
    pub fn layout_detached(&mut self, id: ElementId, constraints: BoxConstraints) -> Result<Size> {
        self.node(id)?;
        let size = self.layout_element(id, constraints);
        self.update_abs_positions(id);
        Ok(size)
    }

    /// Lay out each boundary in turn. A boundary whose size changed has a
    /// stale parent, so the boundary enclosing that parent is queued in
    /// its place along with anything else it covers.
    fn relayout_boundaries(&mut self, boundaries: Vec<ElementId>) {
        let mut queue: VecDeque<ElementId> = boundaries.into();
        while let Some(boundary) = queue.pop_front() {
            if !self.relayout_boundary(boundary) {
                continue;
            }
            let Some(parent) = self.tree.parent(boundary) else {
                continue;
            };
            let outer = self.find_relayout_boundary(parent);
            debug!(element = %boundary, outer = %outer, "boundary resized, escalating");
            queue.retain(|id| *id != outer && !self.tree.is_ancestor(outer, *id));
            queue.push_back(outer);
        }
    }

    /// Returns true if the boundary's size changed.
    fn relayout_boundary(&mut self, id: ElementId) -> bool {
        let constraints = if self.root == Some(id) {
            BoxConstraints::tight(self.options.viewport)
        } else {
            match self.tree.get(id).and_then(|node| node.prev_constraints) {
                Some(constraints) => constraints,
                None => {
                    warn!(element = %id, "relayout boundary was never laid out");
                    return false;
                }
            }
        };
        let previous = self.tree.get(id).map(|node| node.size);
        let size = self.layout_element(id, constraints);
        self.update_abs_positions(id);
        if let Some(node) = self.tree.get_mut(id) {
            node.is_changed = true;
        }
        let boundary = self.nearest_repaint_boundary(id);
        self.repaint.insert(boundary);
        previous.is_some_and(|previous| previous != size)
    }

    fn layout_element(&mut self, id: ElementId, constraints: BoxConstraints) -> Size {
        let is_root = self.root == Some(id);
        let Some(node) = self.tree.get_mut(id) else {
            warn!(element = %id, "laying out a destroyed element");
            return constraints.min_size();
        };
        let Some(mut kind) = node.kind.take() else {
            warn!(element = %id, "element laid out while already in layout");
            return node.size;
        };
        let has_child = !node.children.is_empty();
        node.is_relayout_boundary =
            is_root || constraints.is_tight() || kind.sized_by_constraints(has_child);
        node.prev_constraints = Some(constraints);

        let size = kind.layout(self, id, constraints);
        let clamped = constraints.constrain(size);
        let outside = (clamped.width - size.width).abs() > 0.01
            || (clamped.height - size.height).abs() > 0.01;
        debug_assert!(!outside, "{} returned {size:?} outside of {constraints:?}", kind.name());
        if outside {
            warn!(
                element = %id,
                kind = kind.name(),
                ?size,
                ?constraints,
                "size outside constraints, clamping"
            );
        }
        trace!(element = %id, kind = kind.name(), ?clamped, "laid out");

        if let Some(node) = self.tree.get_mut(id) {
            node.kind = Some(kind);
            node.size = clamped;
        }
        clamped
    }

    fn update_abs_positions(&mut self, id: ElementId) {
        let origin = self
            .tree
            .parent(id)
            .and_then(|parent| self.tree.get(parent))
            .map_or(Position::ZERO, |parent| parent.abs_position);
        let mut stack = vec![(id, origin)];
        while let Some((current, parent_abs)) = stack.pop() {
            let Some(node) = self.tree.get_mut(current) else {
                continue;
            };
            node.abs_position = parent_abs + node.rel_position;
            let abs = node.abs_position;
            stack.extend(node.children.iter().map(|child| (*child, abs)));
        }
    }

    fn notify_size_observers(&mut self) {
        for observer in self.size_observers.values_mut() {
            let Some(node) = self.tree.get(observer.id) else {
                continue;
            };
            if node.prev_constraints.is_none() || observer.last == Some(node.size) {
                continue;
            }
            observer.last = Some(node.size);
            (observer.callback)(node.size);
        }
    }

    fn paint(&mut self, root: ElementId) {
        let _span = debug_span!("paint", repaint = self.repaint.len()).entered();
        self.scene.reset(self.options.viewport);
        self.boundaries.clear();
        self.painting_changed = false;
        self.paint_element(root);
        self.repaint.clear();
        self.need_recompose = false;
    }

    // Services for element variants

    pub(crate) fn first_child(&self, id: ElementId) -> Option<ElementId> {
        self.tree.get(id).and_then(|node| node.children.first().copied())
    }

    pub(crate) fn child_ids(&self, id: ElementId) -> Children {
        self.tree.get(id).map(|node| node.children.clone()).unwrap_or_default()
    }

    /// Lay out a child of the element currently in layout.
    pub(crate) fn layout_child(&mut self, child: ElementId, constraints: BoxConstraints) -> Size {
        self.layout_element(child, constraints)
    }

    pub(crate) fn set_rel_position(&mut self, id: ElementId, position: Position) {
        if let Some(node) = self.tree.get_mut(id) {
            node.rel_position = position;
        }
    }

    pub(crate) fn set_clip(&mut self, id: ElementId, clip: Option<ClipPath>) {
        if let Some(node) = self.tree.get_mut(id) {
            node.clip = clip;
        }
    }

    pub(crate) fn size_of(&self, id: ElementId) -> Size {
        self.tree.get(id).map_or(Size::ZERO, |node| node.size)
    }

    /// Create an element owned by another element's layout. Its children
    /// are attached without marking anything changed.
    pub(crate) fn create_generated(
        &mut self,
        kind: impl Into<ElementKind>,
        children: &[ElementId],
    ) -> ElementId {
        let id = self.create(kind);
        for child in children {
            if let Some(node) = self.tree.get_mut(*child) {
                node.parent = Some(id);
            }
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.children.extend_from_slice(children);
        }
        id
    }

    /// Destroy the element's children and adopt `children` instead.
    pub(crate) fn replace_generated_children(&mut self, id: ElementId, children: Vec<ElementId>) {
        let old = self.child_ids(id);
        for child in old {
            self.free_subtree(child);
        }
        for child in &children {
            if let Some(node) = self.tree.get_mut(*child) {
                node.parent = Some(id);
            }
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.children = children.into_iter().collect();
        }
    }

    /// Paint an element and its subtree.
    pub(crate) fn paint_element(&mut self, id: ElementId) {
        let parent_changed = self.painting_changed;
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let is_changed = parent_changed || node.is_changed;
        node.is_changed = false;
        let Some(kind) = node.kind.take() else {
            warn!(element = %id, "element painted while already in paint");
            return;
        };
        let abs = node.abs_position;
        let clip = node.clip.clone();
        let is_boundary = node.is_repaint_boundary();
        let origin = self.boundaries.last().map_or(Position::ZERO, |(_, origin)| *origin);
        let offset = abs - origin;

        self.painting_changed = is_changed;
        if let Some(clip) = &clip {
            self.scene.push_clip(clip.translated(offset));
        }
        if is_boundary {
            self.paint_boundary(id, &kind, offset, is_changed);
        } else {
            kind.paint(self, id);
        }
        if clip.is_some() {
            self.scene.pop_clip();
        }
        self.painting_changed = parent_changed;

        if let Some(node) = self.tree.get_mut(id) {
            node.kind = Some(kind);
        }
    }

    fn paint_boundary(&mut self, id: ElementId, kind: &ElementKind, offset: Position, is_changed: bool) {
        let boundary_changed = is_changed || self.repaint.contains(&id);
        let layer = kind.as_layer();
        let translation = Affine2::from_translation(Vec2::new(offset.left, offset.top));
        let transform = layer.map_or(translation, |layer| translation * layer.transform);
        self.scene.push_transform(transform);
        if let Some(layer) = layer {
            self.scene.push_opacity(layer.opacity);
        }
        if let Some(cache) = self.tree.get_mut(id).and_then(|node| node.paint_cache.as_mut()) {
            cache.restart(boundary_changed);
        }
        trace!(element = %id, changed = boundary_changed, "paint boundary");

        let abs = self.tree.get(id).map_or(Position::ZERO, |node| node.abs_position);
        self.boundaries.push((id, abs));
        kind.paint(self, id);
        self.boundaries.pop();

        if let Some(cache) = self.tree.get_mut(id).and_then(|node| node.paint_cache.as_mut()) {
            cache.finish();
        }
        if layer.is_some() {
            self.scene.pop_opacity();
        }
        self.scene.pop_transform();
    }

    /// Draw content for `id` through the paint cache of its repaint
    /// boundary. `painter` draws in the element's own coordinates.
    pub(crate) fn draw<F>(&mut self, id: ElementId, painter: F)
    where
        F: FnOnce(&mut dyn Canvas),
    {
        let Some(&(boundary, origin)) = self.boundaries.last() else {
            warn!(element = %id, "draw outside of paint");
            return;
        };
        let offset = self.tree.get(id).map_or(Position::ZERO, |node| node.abs_position) - origin;
        self.scene.push_transform(Affine2::from_translation(Vec2::new(offset.left, offset.top)));
        match self.tree.get_mut(boundary).and_then(|node| node.paint_cache.as_mut()) {
            Some(cache) => cache.paint(&mut self.scene, painter),
            None => painter(&mut self.scene),
        }
        self.scene.pop_transform();
    }

    // Observation and measurement

    /// Call `callback` with the element's size after every relayout that
    /// changes it, starting with the first one.
    pub fn observe_element_size<F>(&mut self, id: ElementId, callback: F) -> Result<SubscriptionToken>
    where
        F: FnMut(Size) + 'static,
    {
        self.node(id)?;
        let token = self.tokens.next();
        self.size_observers.insert(token, SizeObserver { id, last: None, callback: Box::new(callback) });
        Ok(token)
    }

    pub fn unobserve(&mut self, token: SubscriptionToken) -> bool {
        self.size_observers.shift_remove(&token).is_some()
    }

    /// Width of the element's content when nothing wraps. Elements other
    /// than text and paragraphs report their last laid out width.
    pub fn intrinsic_width(&self, id: ElementId) -> Result<f32> {
        match self.element(id)? {
            ElementKind::Text(text) => {
                Ok(self.backend.measure_text_width(&text.text, &text.style, None))
            }
            ElementKind::Paragraph(paragraph) => Ok(paragraph.intrinsic_width(self)),
            ElementKind::Flex(flex) => flex.intrinsic_width(self, id),
            ElementKind::FlexChild(_) => match self.first_child(id) {
                Some(child) => self.intrinsic_width(child),
                None => Ok(0.0),
            },
            _ => Ok(self.size(id)?.width),
        }
    }

    /// Height of the element's content laid out at `width`. Elements other
    /// than text and paragraphs report their last laid out height.
    pub fn intrinsic_height(&self, id: ElementId, width: f32) -> Result<f32> {
        match self.element(id)? {
            ElementKind::Text(text) => Ok(self.backend.line_metrics(&text.style).height),
            ElementKind::Paragraph(paragraph) => Ok(paragraph.intrinsic_height(self, width)),
            ElementKind::Flex(flex) => flex.intrinsic_height(self, id, width),
            ElementKind::FlexChild(_) => match self.first_child(id) {
                Some(child) => self.intrinsic_height(child, width),
                None => Ok(0.0),
            },
            _ => Ok(self.size(id)?.height),
        }
    }

    // Input

    /// Responders under `point`, frontmost first, on up to date geometry.
    pub fn hit_test(&mut self, point: Position) -> Vec<ElementId> {
        self.relayout();
        match self.root {
            Some(root) => hit_test(&self.tree, root, point),
            None => Vec::new(),
        }
    }

    /// Dispatch a pointer event to listeners and to the responders under it.
    ///
    /// Listeners and responders may change the tree. Responders removed
    /// by an earlier call in the same dispatch are skipped; the hit set
    /// is not recomputed until the next event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        let _span = debug_span!("pointer_event", pointer_id = event.pointer_id).entered();
        let before = self.pointer_events.before_handlers();
        dispatch(self, before, event, |doc, token| doc.pointer_events.is_connected(token));
        let hits = self.hit_test(event.position());
        let calls = self.pointer_events.update_hits(event, hits);
        for (id, event_type) in calls {
            let handler = self
                .tree
                .get(id)
                .and_then(|node| node.kind.as_ref())
                .and_then(ElementKind::as_responder)
                .and_then(|responder| responder.handler.clone());
            let Some(handler) = handler else {
                continue;
            };
            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(self, event, event_type),
                Err(_) => warn!(element = %id, "responder handler is already running"),
            };
        }
        let tracked = self.pointer_events.pointer_handlers(event.pointer_id);
        dispatch(self, tracked, event, |doc, token| doc.pointer_events.is_connected(token));
        let after = self.pointer_events.after_handlers();
        dispatch(self, after, event, |doc, token| doc.pointer_events.is_connected(token));
        self.pointer_events.finish(event);
    }

    /// See [`PointerEventManager::add_handler`].
    pub fn add_pointer_handler<F>(&mut self, handler: F, after_elements: bool) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        self.pointer_events.add_handler(handler, after_elements)
    }

    /// See [`PointerEventManager::start_tracking_pointer`].
    pub fn start_tracking_pointer<F>(&mut self, pointer_id: i32, handler: F) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        self.pointer_events.start_tracking_pointer(pointer_id, handler)
    }

    pub fn remove_pointer_handler(&mut self, token: SubscriptionToken) -> bool {
        self.pointer_events.remove_handler(token)
    }

    pub fn pointer_events(&self) -> &PointerEventManager {
        &self.pointer_events
    }

    /// Listen to key events. The handler may change the document.
    pub fn add_key_handler<F>(&mut self, handler: F) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &KeyEvent) + 'static,
    {
        let token = self.tokens.next();
        let handler: Handler<Document, KeyEvent> = Rc::new(RefCell::new(handler));
        self.key_signal.connect(token, handler);
        token
    }

    pub fn remove_key_handler(&mut self, token: SubscriptionToken) -> bool {
        self.key_signal.disconnect(token)
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        let handlers = self.key_signal.handlers();
        dispatch(self, handlers, event, |doc, token| doc.key_signal.contains(token));
    }

    pub fn add_scroll_handler<F>(&mut self, handler: F) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &ScrollEvent) + 'static,
    {
        let token = self.tokens.next();
        let handler: Handler<Document, ScrollEvent> = Rc::new(RefCell::new(handler));
        self.scroll_signal.connect(token, handler);
        token
    }

    pub fn remove_scroll_handler(&mut self, token: SubscriptionToken) -> bool {
        self.scroll_signal.disconnect(token)
    }

    pub fn handle_scroll_event(&mut self, event: &ScrollEvent) {
        let handlers = self.scroll_signal.handlers();
        dispatch(self, handlers, event, |doc, token| doc.scroll_signal.contains(token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Align, Background, Layer, Padding, Responder, SizedBox, Stack, Text};
    use crate::test_utils::test_document;
    use arbor_core::{
        ArborError, Color, EdgeInsets, KeyAction, PointerAction, ResponderEventType, Value,
    };
    use arbor_paint::RenderCommand;
    use arbor_text::TextStyle;
    use std::cell::{Cell, RefCell};

    fn sized(doc: &mut Document, width: f32, height: f32) -> ElementId {
        doc.create(SizedBox::exact(Value::abs(width), Value::abs(height)))
    }

    #[test]
    fn test_tree_mutation_errors() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let a = doc.create(Stack::new());
        let b = doc.create(Stack::new());
        let c = doc.create(Stack::new());
        doc.append_child(a, b).unwrap();
        doc.append_child(b, c).unwrap();

        let err = doc.append_child(c, a).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::Cycle { .. })));
        let err = doc.append_child(a, c).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::AlreadyAttached { .. })));
        let err = doc.remove_child(a, c).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::NotAChild { .. })));

        doc.set_root(a).unwrap();
        let d = doc.create(Stack::new());
        let err = doc.append_child(d, a).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::IsRoot(_))));

        doc.destroy(b).unwrap();
        assert!(doc.children_of(a).unwrap().is_empty());
        let err = doc.size(c).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::StaleElement(_))));
    }

    #[test]
    fn test_insert_and_replace_children() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let parent = doc.create(Stack::new());
        let a = doc.create(Stack::new());
        let b = doc.create(Stack::new());
        let c = doc.create(Stack::new());
        doc.append_child(parent, a).unwrap();
        doc.insert_before_child(parent, b, a).unwrap();
        assert_eq!(doc.children_of(parent).unwrap(), &[b, a]);

        doc.replace_child(parent, b, c).unwrap();
        assert_eq!(doc.children_of(parent).unwrap(), &[c, a]);
        assert!(doc.element(b).is_err());
        assert!(doc.is_parent_of(parent, c));

        doc.remove_child(parent, a).unwrap();
        assert_eq!(doc.parent_of(a).unwrap(), None);
        doc.append_child(c, a).unwrap();
        assert!(doc.is_parent_of(c, a));
    }

    #[test]
    fn test_absolute_positions() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let leaf = sized(&mut doc, 10.0, 10.0);
        let inner = doc
            .create_with_child(Padding::new(EdgeInsets::all(Value::abs(5.0))), leaf)
            .unwrap();
        let root = doc
            .create_with_child(
                Align::new(EdgeInsets::left_top(Value::abs(20.0), Value::abs(30.0))),
                inner,
            )
            .unwrap();
        doc.set_root(root).unwrap();
        assert!(doc.render());

        assert_eq!(doc.abs_position(leaf).unwrap(), Position::new(25.0, 35.0));
        assert_eq!(doc.rel_position(leaf).unwrap(), Position::new(5.0, 5.0));
        assert_eq!(doc.size(inner).unwrap(), Size::new(20.0, 20.0));
    }

    #[test]
    fn test_relayout_boundaries() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let leaf = sized(&mut doc, 10.0, 10.0);
        let padding = doc
            .create_with_child(Padding::new(EdgeInsets::all(Value::abs(5.0))), leaf)
            .unwrap();
        let align = doc.create_with_child(Align::new(EdgeInsets::default()), padding).unwrap();
        let root = doc.create_with_child(Stack::new(), align).unwrap();
        doc.set_root(root).unwrap();
        doc.render();

        assert!(doc.is_relayout_boundary(root).unwrap());
        // fills the space offered, whatever its child does
        assert!(doc.is_relayout_boundary(align).unwrap());
        assert!(!doc.is_relayout_boundary(padding).unwrap());
        assert!(!doc.is_relayout_boundary(leaf).unwrap());

        let padding_sizes = Rc::new(RefCell::new(Vec::new()));
        let log = padding_sizes.clone();
        doc.observe_element_size(padding, move |size| log.borrow_mut().push(size)).unwrap();
        let root_sizes = Rc::new(Cell::new(0));
        let count = root_sizes.clone();
        doc.observe_element_size(root, move |_| count.set(count.get() + 1)).unwrap();

        doc.update(leaf, |kind| {
            if let ElementKind::Sized(sized) = kind {
                *sized = SizedBox::exact(Value::abs(30.0), Value::abs(30.0));
            }
        })
        .unwrap();
        assert!(doc.render());

        assert_eq!(doc.size(padding).unwrap(), Size::new(40.0, 40.0));
        assert_eq!(*padding_sizes.borrow(), vec![Size::new(40.0, 40.0)]);
        // observed once on the first relayout after subscribing, unchanged after
        assert_eq!(root_sizes.get(), 1);
        assert!(!doc.render());
    }

    /// Root stack, padding of 5, then an element that fills while childless.
    fn fill_under_padding(doc: &mut Document, fill: ElementKind) -> (ElementId, ElementId) {
        let fill = doc.create(fill);
        let padding = doc
            .create_with_child(Padding::new(EdgeInsets::all(Value::abs(5.0))), fill)
            .unwrap();
        let root = doc.create_with_child(Stack::new(), padding).unwrap();
        doc.set_root(root).unwrap();
        doc.render();
        assert!(doc.is_relayout_boundary(fill).unwrap());
        assert_eq!(doc.size(padding).unwrap(), Size::new(100.0, 100.0));
        (padding, fill)
    }

    #[test]
    fn test_child_added_to_filling_element_resizes_parent() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let (padding, background) =
            fill_under_padding(&mut doc, Background::new(Color::RED).into());

        let leaf = sized(&mut doc, 10.0, 10.0);
        doc.append_child(background, leaf).unwrap();
        assert!(!doc.is_relayout_boundary(background).unwrap());
        assert!(doc.render());
        assert_eq!(doc.size(background).unwrap(), Size::new(10.0, 10.0));
        assert_eq!(doc.size(padding).unwrap(), Size::new(20.0, 20.0));

        doc.remove_child(background, leaf).unwrap();
        assert!(doc.render());
        assert_eq!(doc.size(background).unwrap(), Size::new(90.0, 90.0));
        assert_eq!(doc.size(padding).unwrap(), Size::new(100.0, 100.0));
        assert!(doc.is_relayout_boundary(background).unwrap());
    }

    #[test]
    fn test_kind_change_resizes_parent() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let (padding, inner) = fill_under_padding(&mut doc, Stack::new().into());

        doc.update(inner, |kind| {
            *kind = SizedBox::exact(Value::abs(10.0), Value::abs(10.0)).into();
        })
        .unwrap();
        assert!(doc.render());
        assert_eq!(doc.size(inner).unwrap(), Size::new(10.0, 10.0));
        assert_eq!(doc.size(padding).unwrap(), Size::new(20.0, 20.0));
        assert_eq!(doc.abs_position(inner).unwrap(), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_resized_boundary_escalates_to_parent() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let (padding, inner) = fill_under_padding(&mut doc, Stack::new().into());

        // bypasses `update`, so the stale flag is still set when relayout runs
        *doc.element_mut(inner).unwrap() = SizedBox::exact(Value::abs(30.0), Value::abs(10.0)).into();
        doc.change(inner).unwrap();
        assert!(doc.is_relayout_boundary(inner).unwrap());
        assert!(doc.render());
        assert_eq!(doc.size(padding).unwrap(), Size::new(40.0, 20.0));
    }

    #[test]
    fn test_unchanged_boundary_replays_cached_pictures() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let fill = doc.create(Background::new(Color::RED));
        let fill_box = doc
            .create_with_child(SizedBox::exact(Value::abs(10.0), Value::abs(10.0)), fill)
            .unwrap();
        let layer = doc.create_with_child(Layer::new(), fill_box).unwrap();
        let other = doc.create(Background::new(Color::BLUE));
        let other_box = doc
            .create_with_child(SizedBox::exact(Value::abs(20.0), Value::abs(20.0)), other)
            .unwrap();
        let root = doc.create(Stack::new());
        doc.append_child(root, layer).unwrap();
        doc.append_child(root, other_box).unwrap();
        doc.set_root(root).unwrap();
        assert!(doc.render());
        let first = doc.scene().commands.clone();

        // repainting the root leaves the layer's recording in place
        doc.update(other, |kind| {
            if let ElementKind::Background(background) = kind {
                background.color = Color::GREEN;
            }
        })
        .unwrap();
        assert!(doc.render());
        let second = doc.scene().commands.clone();
        assert_eq!(first.len(), second.len());
        let fills: Vec<_> = doc.scene().rects().filter_map(|rect| rect.fill).collect();
        assert_eq!(fills, vec![Color::RED, Color::GREEN]);
        let cache = doc.tree.get(layer).unwrap().paint_cache.as_ref().unwrap();
        assert!(!cache.is_changed());
        assert_eq!(cache.len(), 1);
    }

    fn has_opacity(doc: &Document, opacity: f32) -> bool {
        doc.scene()
            .commands
            .iter()
            .any(|command| matches!(command, RenderCommand::PushOpacity(o) if *o == opacity))
    }

    #[test]
    fn test_layer_transform_recomposes_without_repaint() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let fill = doc.create(Background::new(Color::RED));
        let layer = doc.create_with_child(Layer::new().with_opacity(0.0), fill).unwrap();
        doc.set_root(layer).unwrap();
        assert!(doc.render());
        assert!(has_opacity(&doc, 0.0));

        assert!(!doc.render());
        doc.set_layer_transform(layer, Affine2::from_translation(Vec2::new(5.0, 0.0))).unwrap();
        doc.set_layer_opacity(layer, 0.5).unwrap();
        assert!(doc.render());
        assert!(has_opacity(&doc, 0.5));
        let moved = Affine2::from_translation(Vec2::new(5.0, 0.0));
        assert!(doc
            .scene()
            .commands
            .iter()
            .any(|command| matches!(command, RenderCommand::PushTransform(t) if *t == moved)));

        let err = doc.set_layer_opacity(fill, 1.0).unwrap_err();
        assert!(matches!(err, ArborError::Tree(TreeError::NotALayer(_))));
    }

    #[test]
    fn test_viewport_change_relays_out_root() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let root = doc.create(Stack::new());
        doc.set_root(root).unwrap();
        doc.render();
        assert_eq!(doc.size(root).unwrap(), Size::new(100.0, 100.0));

        doc.set_viewport(Size::new(50.0, 60.0)).unwrap();
        assert!(doc.render());
        assert_eq!(doc.size(root).unwrap(), Size::new(50.0, 60.0));
        assert_eq!(doc.scene().size(), Size::new(50.0, 60.0));
        assert!(doc.set_viewport(Size::new(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_pointer_dispatch_sequence() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut responder = |name: &'static str, left: f32, width: f32| {
            let log = log.clone();
            let target = sized(&mut doc, width, 50.0);
            let responder = Responder::new(move |_, _, event_type| log.borrow_mut().push((name, event_type)))
                .with_mode(crate::pointer_events::HitTestMode::PassThrough);
            let responder = doc.create_with_child(responder, target).unwrap();
            let align = Align::new(EdgeInsets::left_top(Value::abs(left), Value::abs(0.0)));
            doc.create_with_child(align, responder).unwrap()
        };
        // a covers 0..40, b 20..60, c 50..100
        let a = responder("a", 0.0, 40.0);
        let b = responder("b", 20.0, 40.0);
        let c = responder("c", 50.0, 50.0);
        let root = doc.create(Stack::new());
        for child in [c, b, a] {
            doc.append_child(root, child).unwrap();
        }
        doc.set_root(root).unwrap();

        let order = Rc::new(RefCell::new(Vec::new()));
        for (name, after) in [("before", false), ("after", true)] {
            let order = order.clone();
            doc.add_pointer_handler(move |_, _| order.borrow_mut().push(name), after);
        }

        use ResponderEventType::{Add, Remove, Update};
        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerDown, 30.0, 10.0));
        assert_eq!(*log.borrow(), vec![("a", Add), ("b", Add)]);
        log.borrow_mut().clear();

        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerMove, 55.0, 10.0));
        assert_eq!(*log.borrow(), vec![("a", Remove), ("b", Update), ("c", Add)]);
        log.borrow_mut().clear();

        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerUp, 5.0, 10.0));
        assert_eq!(*log.borrow(), vec![("b", Remove), ("c", Remove)]);
        assert_eq!(doc.pointer_events().hit_elements(1), None);
        assert_eq!(order.borrow().len(), 6);
        assert_eq!(order.borrow()[..2], ["before", "after"]);
    }

    #[test]
    fn test_handlers_mutate_tree_during_dispatch() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let fill = doc.create(Background::new(Color::RED));
        let target = doc
            .create_with_child(SizedBox::exact(Value::abs(40.0), Value::abs(40.0)), fill)
            .unwrap();
        let responder = doc
            .create_with_child(
                Responder::new(move |doc: &mut Document, _: &PointerEvent, event_type| {
                    if event_type == ResponderEventType::Add {
                        doc.update(fill, |kind| {
                            if let ElementKind::Background(background) = kind {
                                background.color = Color::GREEN;
                            }
                        })
                        .unwrap();
                    }
                }),
                target,
            )
            .unwrap();
        let root = doc.create_with_child(Stack::new(), responder).unwrap();
        doc.set_root(root).unwrap();
        doc.add_key_handler(move |doc, _| {
            let extra = doc.create(SizedBox::exact(Value::abs(70.0), Value::abs(10.0)));
            doc.append_child(root, extra).unwrap();
        });
        doc.render();

        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerDown, 10.0, 10.0));
        assert!(doc.render());
        let fills: Vec<Color> = doc.scene().rects().filter_map(|rect| rect.fill).collect();
        assert_eq!(fills, vec![Color::GREEN]);

        doc.handle_key_event(&KeyEvent::new(32, KeyAction::Press));
        assert_eq!(doc.children_of(root).unwrap().len(), 2);
        assert!(doc.render());
        let extra = doc.children_of(root).unwrap()[1];
        assert_eq!(doc.size(extra).unwrap(), Size::new(70.0, 10.0));
    }

    #[test]
    fn test_key_and_scroll_handlers() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let keys = Rc::new(Cell::new(0));
        let count = keys.clone();
        let token = doc.add_key_handler(move |_, _| count.set(count.get() + 1));
        doc.handle_key_event(&KeyEvent::new(13, KeyAction::Press));
        assert!(doc.remove_key_handler(token));
        doc.handle_key_event(&KeyEvent::new(13, KeyAction::Release));
        assert_eq!(keys.get(), 1);

        let scrolled = Rc::new(Cell::new(0.0));
        let total = scrolled.clone();
        doc.add_scroll_handler(move |_, event| total.set(total.get() + event.top));
        doc.handle_scroll_event(&ScrollEvent { left: 0.0, top: 12.0 });
        assert_eq!(scrolled.get(), 12.0);
    }

    #[test]
    fn test_intrinsic_text_size() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let text = doc.create(Text::new("hello", TextStyle::with_size(10.0)));
        assert_eq!(doc.intrinsic_width(text).unwrap(), 25.0);
        assert_eq!(doc.intrinsic_height(text, 100.0).unwrap(), 10.0);
    }
}

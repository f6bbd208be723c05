//! The closed set of element variants and the behavior they share.

use arbor_core::{BoxConstraints, ElementId, Size};

use crate::document::Document;
use crate::elements::{
    Align, Background, Border, Clip, Flex, FlexChild, Image, Layer, Overflow, Padding, Paragraph,
    Responder, SizedBox, Stack, Text, Translated,
};
use crate::pointer_events::HitTestMode;

/// Layout and paint behavior of one element variant.
///
/// Children are not stored in the variant. They live in the document's
/// arena and are reached through the element's id.
pub(crate) trait ElementBehavior {
    fn name(&self) -> &'static str;

    /// True when the element's size is a function of its incoming
    /// constraints alone, so nothing inside it can change its size.
    fn sized_by_constraints(&self, _has_child: bool) -> bool {
        false
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::PassToParent
    }

    /// Lay out the element's children and return its own size.
    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size;

    /// Draw the element and its children.
    fn paint(&self, doc: &mut Document, id: ElementId) {
        for child in doc.child_ids(id) {
            doc.paint_element(child);
        }
    }
}

/// An element variant, as stored in a [`Document`].
#[derive(Debug, Clone)]
pub enum ElementKind {
    Align(Align),
    Padding(Padding),
    Sized(SizedBox),
    Stack(Stack),
    Flex(Flex),
    FlexChild(FlexChild),
    Translated(Translated),
    Overflow(Overflow),
    Background(Background),
    Clip(Clip),
    Layer(Layer),
    Border(Border),
    Text(Text),
    Image(Image),
    Paragraph(Paragraph),
    Responder(Responder),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            ElementKind::Align($inner) => $body,
            ElementKind::Padding($inner) => $body,
            ElementKind::Sized($inner) => $body,
            ElementKind::Stack($inner) => $body,
            ElementKind::Flex($inner) => $body,
            ElementKind::FlexChild($inner) => $body,
            ElementKind::Translated($inner) => $body,
            ElementKind::Overflow($inner) => $body,
            ElementKind::Background($inner) => $body,
            ElementKind::Clip($inner) => $body,
            ElementKind::Layer($inner) => $body,
            ElementKind::Border($inner) => $body,
            ElementKind::Text($inner) => $body,
            ElementKind::Image($inner) => $body,
            ElementKind::Paragraph($inner) => $body,
            ElementKind::Responder($inner) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ElementKind {
                fn from(value: $ty) -> Self {
                    ElementKind::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    Align(Align),
    Padding(Padding),
    Sized(SizedBox),
    Stack(Stack),
    Flex(Flex),
    FlexChild(FlexChild),
    Translated(Translated),
    Overflow(Overflow),
    Background(Background),
    Clip(Clip),
    Layer(Layer),
    Border(Border),
    Text(Text),
    Image(Image),
    Paragraph(Paragraph),
    Responder(Responder),
);

impl ElementKind {
    /// Debug name of the variant.
    pub fn name(&self) -> &'static str {
        dispatch!(self, inner => inner.name())
    }

    pub(crate) fn sized_by_constraints(&self, has_child: bool) -> bool {
        dispatch!(self, inner => inner.sized_by_constraints(has_child))
    }

    pub(crate) fn is_repaint_boundary_by_default(&self) -> bool {
        matches!(self, ElementKind::Layer(_))
    }

    pub(crate) fn hit_test_mode(&self) -> HitTestMode {
        dispatch!(self, inner => inner.hit_test_mode())
    }

    pub(crate) fn layout(
        &mut self,
        doc: &mut Document,
        id: ElementId,
        constraints: BoxConstraints,
    ) -> Size {
        dispatch!(self, inner => inner.layout(doc, id, constraints))
    }

    pub(crate) fn paint(&self, doc: &mut Document, id: ElementId) {
        dispatch!(self, inner => inner.paint(doc, id))
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            ElementKind::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn as_flex_child(&self) -> Option<&FlexChild> {
        match self {
            ElementKind::FlexChild(child) => Some(child),
            _ => None,
        }
    }

    pub fn as_responder(&self) -> Option<&Responder> {
        match self {
            ElementKind::Responder(responder) => Some(responder),
            _ => None,
        }
    }

    pub fn as_layer(&self) -> Option<&Layer> {
        match self {
            ElementKind::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    pub(crate) fn as_layer_mut(&mut self) -> Option<&mut Layer> {
        match self {
            ElementKind::Layer(layer) => Some(layer),
            _ => None,
        }
    }
}

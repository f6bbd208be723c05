use std::rc::Rc;

use arbor_core::ElementId;
use arbor_text::{LineMetrics, TextBackend};

use crate::document::Document;
use crate::elements::{Responder, ResponderHandler};
use crate::inline_layout::{InlineConstraints, InlineLayoutResult, Span, SpanBase};
use crate::pointer_events::HitTestMode;

/// Inline content that receives pointer events.
///
/// When the content is split across lines every part shares the same
/// handler, so a pointer moving from one line to the next stays on the same
/// logical responder.
#[derive(Clone)]
pub struct ResponderSpan {
    pub child: Box<Span>,
    pub mode: HitTestMode,
    pub handler: Option<ResponderHandler>,
    pub base: SpanBase,
}

impl ResponderSpan {
    pub fn new(child: impl Into<Span>, handler: Option<ResponderHandler>) -> Self {
        Self {
            child: Box::new(child.into()),
            mode: HitTestMode::default(),
            handler,
            base: SpanBase::default(),
        }
    }

    pub fn with_mode(mut self, mode: HitTestMode) -> Self {
        self.mode = mode;
        self
    }

    fn wrap_child(&self, child: Span, base: SpanBase) -> ResponderSpan {
        ResponderSpan {
            child: Box::new(child),
            mode: self.mode,
            handler: self.handler.clone(),
            base,
        }
    }

    pub fn layout(
        &self,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        match self.child.layout(constraints, backend) {
            InlineLayoutResult::Fit { width, metrics, span } => {
                InlineLayoutResult::fit(width, metrics, self.wrap_child(span, self.base))
            }
            InlineLayoutResult::Split { width, metrics, fit, remainder } => {
                let remainder_base = SpanBase::new(self.base.prev_offset + fit.text_len());
                InlineLayoutResult::split(
                    width,
                    metrics,
                    self.wrap_child(fit, self.base),
                    self.wrap_child(remainder, remainder_base),
                )
            }
            InlineLayoutResult::Wrap { .. } => InlineLayoutResult::wrap(self.clone()),
        }
    }

    pub(crate) fn render(&self, doc: &mut Document, metrics: LineMetrics) -> ElementId {
        let child = self.child.render(doc, metrics);
        let responder = Responder { mode: self.mode, handler: self.handler.clone() };
        doc.create_generated(responder, &[child])
    }
}

/// Handlers compare by identity.
impl PartialEq for ResponderSpan {
    fn eq(&self, other: &Self) -> bool {
        let same_handler = match (&self.handler, &other.handler) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_handler && self.mode == other.mode && self.base == other.base && self.child == other.child
    }
}

impl std::fmt::Debug for ResponderSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponderSpan")
            .field("child", &self.child)
            .field("mode", &self.mode)
            .field("has_handler", &self.handler.is_some())
            .field("base", &self.base)
            .finish()
    }
}

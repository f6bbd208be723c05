use arbor_core::{BoxConstraints, ElementId, Position, Result, Size};
use smallvec::SmallVec;

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::pointer_events::HitTestMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Distribution of free space along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexJustify {
    #[default]
    Start,
    Center,
    End,
    /// Half a gap before the first child and after the last
    SpaceAround,
    /// No gap before the first child or after the last
    SpaceBetween,
    /// Equal gaps everywhere
    SpaceEvenly,
}

/// Placement of a child along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
    /// Start, with the child's minimum cross size raised to the line's
    Stretch,
}

/// Lays its children out in a row or column.
///
/// Children that are not [`FlexChild`]ren with a positive flex factor take
/// their natural size first. The main-axis space they leave is shared
/// between the flexible children in proportion to their factors. The flex
/// fills its main axis when it is bounded, and is as tall (or wide) across
/// as its largest child.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flex {
    pub direction: FlexDirection,
    pub justify: FlexJustify,
    pub align: FlexAlign,
}

impl Flex {
    pub fn new(direction: FlexDirection) -> Self {
        Self { direction, ..Self::default() }
    }

    pub fn row() -> Self {
        Self::new(FlexDirection::Row)
    }

    pub fn column() -> Self {
        Self::new(FlexDirection::Column)
    }

    pub fn with_justify(mut self, justify: FlexJustify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align(mut self, align: FlexAlign) -> Self {
        self.align = align;
        self
    }

    fn main(&self, size: Size) -> f32 {
        match self.direction {
            FlexDirection::Row => size.width,
            FlexDirection::Column => size.height,
        }
    }

    fn cross(&self, size: Size) -> f32 {
        match self.direction {
            FlexDirection::Row => size.height,
            FlexDirection::Column => size.width,
        }
    }

    fn axis_size(&self, main: f32, cross: f32) -> Size {
        match self.direction {
            FlexDirection::Row => Size::new(main, cross),
            FlexDirection::Column => Size::new(cross, main),
        }
    }

    fn axis_position(&self, main: f32, cross: f32) -> Position {
        match self.direction {
            FlexDirection::Row => Position::new(main, cross),
            FlexDirection::Column => Position::new(cross, main),
        }
    }

    fn axis_constraints(
        &self,
        min_main: f32,
        max_main: f32,
        min_cross: f32,
        max_cross: f32,
    ) -> BoxConstraints {
        match self.direction {
            FlexDirection::Row => BoxConstraints::new(min_main, max_main, min_cross, max_cross),
            FlexDirection::Column => BoxConstraints::new(min_cross, max_cross, min_main, max_main),
        }
    }

    /// Sum of the children's widths in a row, the widest child in a column.
    pub(crate) fn intrinsic_width(&self, doc: &Document, id: ElementId) -> Result<f32> {
        let mut result = 0.0f32;
        for child in doc.children_of(id)? {
            let width = doc.intrinsic_width(*child)?;
            result = match self.direction {
                FlexDirection::Row => result + width,
                FlexDirection::Column => result.max(width),
            };
        }
        Ok(result)
    }

    /// Sum of the children's heights in a column, the tallest child in a row.
    pub(crate) fn intrinsic_height(&self, doc: &Document, id: ElementId, width: f32) -> Result<f32> {
        let mut result = 0.0f32;
        for child in doc.children_of(id)? {
            let height = doc.intrinsic_height(*child, width)?;
            result = match self.direction {
                FlexDirection::Row => result.max(height),
                FlexDirection::Column => result + height,
            };
        }
        Ok(result)
    }
}

struct Slot {
    id: ElementId,
    flex: u32,
    tight_fit: bool,
    align: FlexAlign,
    size: Size,
}

impl ElementBehavior for Flex {
    fn name(&self) -> &'static str {
        "Flex"
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::Disabled
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let mut slots: SmallVec<[Slot; 8]> = doc
            .child_ids(id)
            .into_iter()
            .map(|child| {
                let params = doc.element(child).ok().and_then(|kind| kind.as_flex_child());
                Slot {
                    id: child,
                    flex: params.map_or(0, |params| params.flex),
                    tight_fit: params.is_some_and(|params| params.tight_fit),
                    align: params.and_then(|params| params.align).unwrap_or(self.align),
                    size: Size::ZERO,
                }
            })
            .collect();

        let (max_main, min_cross, max_cross) = match self.direction {
            FlexDirection::Row => (constraints.max_width, constraints.min_height, constraints.max_height),
            FlexDirection::Column => (constraints.max_height, constraints.min_width, constraints.max_width),
        };
        let stretch_cross = if max_cross.is_finite() { max_cross } else { 0.0 };
        let min_cross_of = |align: FlexAlign| if align == FlexAlign::Stretch { stretch_cross } else { 0.0 };

        let mut remaining = max_main;
        let mut used_main = 0.0f32;
        let mut max_child_cross = 0.0f32;
        let total_flex: u32 = slots.iter().map(|slot| slot.flex).sum();

        for slot in slots.iter_mut().filter(|slot| slot.flex == 0) {
            let child_constraints =
                self.axis_constraints(0.0, remaining.max(0.0), min_cross_of(slot.align), max_cross);
            slot.size = doc.layout_child(slot.id, child_constraints);
            remaining -= self.main(slot.size);
            used_main += self.main(slot.size);
            max_child_cross = max_child_cross.max(self.cross(slot.size));
        }

        let remaining = remaining.max(0.0);
        if total_flex > 0 {
            let share = remaining / total_flex as f32;
            for slot in slots.iter_mut().filter(|slot| slot.flex > 0) {
                let child_main = share * slot.flex as f32;
                let min_main = if slot.tight_fit && child_main.is_finite() { child_main } else { 0.0 };
                let child_constraints =
                    self.axis_constraints(min_main, child_main, min_cross_of(slot.align), max_cross);
                slot.size = doc.layout_child(slot.id, child_constraints);
                used_main += self.main(slot.size);
                max_child_cross = max_child_cross.max(self.cross(slot.size));
            }
        }

        let main = if max_main.is_finite() { max_main } else { used_main };
        let free = (main - used_main).max(0.0);
        let cross = max_child_cross.max(min_cross).min(max_cross);

        let count = slots.len() as f32;
        let (mut position, space_before, space_after) = match self.justify {
            FlexJustify::Start => (0.0, 0.0, 0.0),
            FlexJustify::Center => (free / 2.0, 0.0, 0.0),
            FlexJustify::End => (free, 0.0, 0.0),
            FlexJustify::SpaceAround if count > 0.0 => {
                let half = free / count / 2.0;
                (0.0, half, half)
            }
            FlexJustify::SpaceBetween if count > 1.0 => (0.0, 0.0, free / (count - 1.0)),
            FlexJustify::SpaceEvenly => (0.0, free / (count + 1.0), 0.0),
            FlexJustify::SpaceAround | FlexJustify::SpaceBetween => (0.0, 0.0, 0.0),
        };
        for slot in &slots {
            position += space_before;
            let child_cross = self.cross(slot.size);
            let cross_position = match slot.align {
                FlexAlign::Start | FlexAlign::Stretch => 0.0,
                FlexAlign::Center => (cross - child_cross) / 2.0,
                FlexAlign::End => cross - child_cross,
            };
            doc.set_rel_position(slot.id, self.axis_position(position, cross_position));
            position += self.main(slot.size) + space_after;
        }

        constraints.constrain(self.axis_size(main, cross))
    }
}

/// Flex parameters for one child of a [`Flex`].
///
/// Passes its constraints through to its child. The flex reads the
/// parameters when sizing the child's share.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlexChild {
    /// Share of the free main-axis space; zero keeps the natural size
    pub flex: u32,
    /// Overrides the flex's cross-axis alignment
    pub align: Option<FlexAlign>,
    /// Take the whole share instead of at most the share
    pub tight_fit: bool,
}

impl FlexChild {
    pub fn new(flex: u32) -> Self {
        Self { flex, align: None, tight_fit: true }
    }

    pub fn with_align(mut self, align: FlexAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_tight_fit(mut self, tight_fit: bool) -> Self {
        self.tight_fit = tight_fit;
        self
    }
}

impl ElementBehavior for FlexChild {
    fn name(&self) -> &'static str {
        "FlexChild"
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::Disabled
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.min_size();
        };
        let child_size = doc.layout_child(child, constraints);
        doc.set_rel_position(child, Position::ZERO);
        constraints.constrain(child_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Background, SizeConstraints, SizedBox, Text};
    use crate::test_utils::test_document;
    use arbor_core::Value;
    use arbor_text::TextStyle;

    fn sized(doc: &mut Document, width: f32, height: f32) -> ElementId {
        doc.create(SizedBox::exact(Value::abs(width), Value::abs(height)))
    }

    fn flex_with(doc: &mut Document, flex: Flex, children: &[ElementId]) -> ElementId {
        let id = doc.create(flex);
        for child in children {
            doc.append_child(id, *child).unwrap();
        }
        id
    }

    fn positions(doc: &Document, children: &[ElementId]) -> Vec<Position> {
        children.iter().map(|child| doc.rel_position(*child).unwrap()).collect()
    }

    #[test]
    fn test_row_places_children_in_sequence() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let a = sized(&mut doc, 10.0, 20.0);
        let b = sized(&mut doc, 30.0, 40.0);
        let row = flex_with(&mut doc, Flex::row(), &[a, b]);
        let size = doc.layout_detached(row, BoxConstraints::loose(Size::new(100.0, 100.0))).unwrap();
        assert_eq!(size, Size::new(100.0, 40.0));
        assert_eq!(positions(&doc, &[a, b]), vec![Position::new(0.0, 0.0), Position::new(10.0, 0.0)]);
    }

    #[test]
    fn test_justify_distributes_free_space() {
        let cases = [
            (FlexJustify::Center, [40.0, 50.0]),
            (FlexJustify::End, [80.0, 90.0]),
            (FlexJustify::SpaceBetween, [0.0, 90.0]),
            (FlexJustify::SpaceAround, [20.0, 70.0]),
            (FlexJustify::SpaceEvenly, [26.666666, 63.333332]),
        ];
        for (justify, expected) in cases {
            let mut doc = test_document(Size::new(500.0, 500.0));
            let a = sized(&mut doc, 10.0, 10.0);
            let b = sized(&mut doc, 10.0, 10.0);
            let row = flex_with(&mut doc, Flex::row().with_justify(justify), &[a, b]);
            doc.layout_detached(row, BoxConstraints::loose(Size::new(100.0, 100.0))).unwrap();
            let lefts: Vec<f32> = positions(&doc, &[a, b]).iter().map(|p| p.left).collect();
            for (left, expected) in lefts.iter().zip(expected) {
                assert!((left - expected).abs() < 0.001, "{justify:?}: {lefts:?}");
            }
        }
    }

    #[test]
    fn test_cross_alignment_and_child_override() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let tall = sized(&mut doc, 10.0, 50.0);
        let centered = sized(&mut doc, 10.0, 10.0);
        let inner = sized(&mut doc, 10.0, 10.0);
        let at_end = doc.create_with_child(FlexChild::new(0).with_align(FlexAlign::End), inner).unwrap();
        let row = flex_with(&mut doc, Flex::row().with_align(FlexAlign::Center), &[tall, centered, at_end]);
        let size = doc.layout_detached(row, BoxConstraints::loose(Size::new(100.0, 100.0))).unwrap();
        assert_eq!(size.height, 50.0);
        assert_eq!(doc.rel_position(centered).unwrap(), Position::new(10.0, 20.0));
        assert_eq!(doc.rel_position(at_end).unwrap(), Position::new(20.0, 40.0));
    }

    #[test]
    fn test_flexible_children_share_remaining_space() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let fixed = sized(&mut doc, 40.0, 10.0);
        let fill_one = doc.create(Background::new(arbor_core::Color::RED));
        let one = doc.create_with_child(FlexChild::new(1), fill_one).unwrap();
        let fill_two = doc.create(Background::new(arbor_core::Color::BLUE));
        let two = doc.create_with_child(FlexChild::new(2), fill_two).unwrap();
        let loose_content = sized(&mut doc, 5.0, 5.0);
        let loose = doc
            .create_with_child(FlexChild::new(1).with_tight_fit(false), loose_content)
            .unwrap();
        let row = flex_with(&mut doc, Flex::row(), &[one, fixed, two, loose]);
        doc.layout_detached(row, BoxConstraints::tight(Size::new(200.0, 30.0))).unwrap();

        // 160 left after the fixed child, 40 per unit of flex
        assert_eq!(doc.size(one).unwrap(), Size::new(40.0, 30.0));
        assert_eq!(doc.size(two).unwrap(), Size::new(80.0, 30.0));
        assert_eq!(doc.size(loose).unwrap(), Size::new(5.0, 5.0));
        assert_eq!(
            positions(&doc, &[one, fixed, two, loose]),
            vec![
                Position::new(0.0, 0.0),
                Position::new(40.0, 0.0),
                Position::new(80.0, 0.0),
                Position::new(160.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_tight_fit_only_fills_main_axis() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let content = sized(&mut doc, 5.0, 5.0);
        let child = doc.create_with_child(FlexChild::new(1), content).unwrap();
        let row = flex_with(&mut doc, Flex::row().with_align(FlexAlign::Center), &[child]);
        doc.layout_detached(row, BoxConstraints::tight(Size::new(40.0, 30.0))).unwrap();
        assert_eq!(doc.size(child).unwrap(), Size::new(40.0, 5.0));
        assert_eq!(doc.rel_position(child).unwrap(), Position::new(0.0, 12.5));
    }

    #[test]
    fn test_column_stretches_across() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let fill = doc.create(Background::new(arbor_core::Color::RED));
        let short = SizeConstraints::default().with_max(Value::none(), Value::abs(10.0));
        let a = doc.create_with_child(SizedBox::new(short), fill).unwrap();
        let b = sized(&mut doc, 20.0, 15.0);
        let column = flex_with(&mut doc, Flex::column().with_align(FlexAlign::Stretch), &[a, b]);
        let size = doc.layout_detached(column, BoxConstraints::loose(Size::new(60.0, 100.0))).unwrap();
        assert_eq!(size, Size::new(60.0, 100.0));
        assert_eq!(doc.size(a).unwrap(), Size::new(60.0, 10.0));
        assert_eq!(doc.rel_position(b).unwrap(), Position::new(0.0, 10.0));
    }

    #[test]
    fn test_unbounded_main_axis_hugs_children() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let a = sized(&mut doc, 10.0, 20.0);
        let b = sized(&mut doc, 30.0, 5.0);
        let row = flex_with(&mut doc, Flex::row().with_justify(FlexJustify::End), &[a, b]);
        let constraints = BoxConstraints::loose(Size::new(f32::INFINITY, 100.0));
        assert_eq!(doc.layout_detached(row, constraints).unwrap(), Size::new(40.0, 20.0));
        assert_eq!(doc.rel_position(b).unwrap(), Position::new(10.0, 0.0));
    }

    #[test]
    fn test_intrinsic_sizes_follow_direction() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let hello = doc.create(Text::new("hello", TextStyle::with_size(10.0)));
        let hi = doc.create(Text::new("hi", TextStyle::with_size(10.0)));
        let row = flex_with(&mut doc, Flex::row(), &[hello, hi]);
        assert_eq!(doc.intrinsic_width(row).unwrap(), 35.0);
        assert_eq!(doc.intrinsic_height(row, 100.0).unwrap(), 10.0);

        doc.update(row, |kind| *kind = Flex::column().into()).unwrap();
        assert_eq!(doc.intrinsic_width(row).unwrap(), 25.0);
        assert_eq!(doc.intrinsic_height(row, 100.0).unwrap(), 20.0);
    }
}

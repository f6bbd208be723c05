//! Clip paths.

use arbor_core::{Position, Rect, Size};
use lyon::algorithms::hit_test::hit_test_path;
use lyon::geom::point;
use lyon::path::path::Builder;
use lyon::path::{FillRule, Path};

const HIT_TEST_TOLERANCE: f32 = 0.1;

// Control point distance for approximating a quarter ellipse with a cubic.
const KAPPA: f32 = 0.552_284_8;

/// Elliptical corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Radius {
    pub width: f32,
    pub height: f32,
}

impl Radius {
    pub const ZERO: Radius = Radius { width: 0.0, height: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn circular(radius: f32) -> Self {
        Self::new(radius, radius)
    }

    pub fn is_zero(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// The geometric description a clip path was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipShape {
    Rect(Rect),
    /// Radii are top-left, top-right, bottom-right, bottom-left
    RoundedRect(Rect, [Radius; 4]),
}

/// A clip region with its flattened-on-demand lyon path.
#[derive(Debug, Clone)]
pub struct ClipPath {
    shape: ClipShape,
    path: Path,
}

impl ClipPath {
    pub fn rect(rect: Rect) -> Self {
        Self::from_shape(ClipShape::Rect(rect))
    }

    /// Default clip of an element: its own bounds.
    pub fn from_size(size: Size) -> Self {
        Self::rect(Rect::new(0.0, 0.0, size.width, size.height))
    }

    pub fn rounded_rect(rect: Rect, radii: [Radius; 4]) -> Self {
        if radii.iter().all(Radius::is_zero) {
            return Self::rect(rect);
        }
        Self::from_shape(ClipShape::RoundedRect(rect, radii))
    }

    fn from_shape(shape: ClipShape) -> Self {
        let path = match &shape {
            ClipShape::Rect(rect) => build_rounded_rect(rect, &[Radius::ZERO; 4]),
            ClipShape::RoundedRect(rect, radii) => build_rounded_rect(rect, radii),
        };
        Self { shape, path }
    }

    pub fn shape(&self) -> &ClipShape {
        &self.shape
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bounds(&self) -> Rect {
        match &self.shape {
            ClipShape::Rect(rect) | ClipShape::RoundedRect(rect, _) => *rect,
        }
    }

    /// The same clip moved by `offset`.
    pub fn translated(&self, offset: Position) -> Self {
        let shape = match &self.shape {
            ClipShape::Rect(rect) => ClipShape::Rect(offset_rect(rect, offset)),
            ClipShape::RoundedRect(rect, radii) => {
                ClipShape::RoundedRect(offset_rect(rect, offset), *radii)
            }
        };
        Self::from_shape(shape)
    }

    pub fn contains(&self, position: Position) -> bool {
        match &self.shape {
            ClipShape::Rect(rect) => rect.contains(position),
            ClipShape::RoundedRect(rect, _) => {
                rect.contains(position)
                    && hit_test_path(
                        &point(position.left, position.top),
                        self.path.iter(),
                        FillRule::NonZero,
                        HIT_TEST_TOLERANCE,
                    )
            }
        }
    }
}

impl PartialEq for ClipPath {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

fn offset_rect(rect: &Rect, offset: Position) -> Rect {
    Rect::new(rect.left + offset.left, rect.top + offset.top, rect.width, rect.height)
}

/// Build a rectangle path whose corners are quarter ellipses.
pub(crate) fn build_rounded_rect(rect: &Rect, radii: &[Radius; 4]) -> Path {
    let mut builder = Path::builder();
    add_rounded_rect(&mut builder, rect, radii);
    builder.build()
}

/// Append a closed rounded rectangle sub-path to `builder`.
///
/// Radii are top-left, top-right, bottom-right, bottom-left and are clamped
/// to half the rectangle's dimensions.
pub fn add_rounded_rect(builder: &mut Builder, rect: &Rect, radii: &[Radius; 4]) {
    let (l, t, r, b) = (rect.left, rect.top, rect.right(), rect.bottom());
    let [tl, tr, br, bl] = radii.map(|radius| clamp_radius(radius, rect));

    builder.begin(point(l + tl.width, t));
    builder.line_to(point(r - tr.width, t));
    if !tr.is_zero() {
        builder.cubic_bezier_to(
            point(r - tr.width * (1.0 - KAPPA), t),
            point(r, t + tr.height * (1.0 - KAPPA)),
            point(r, t + tr.height),
        );
    }
    builder.line_to(point(r, b - br.height));
    if !br.is_zero() {
        builder.cubic_bezier_to(
            point(r, b - br.height * (1.0 - KAPPA)),
            point(r - br.width * (1.0 - KAPPA), b),
            point(r - br.width, b),
        );
    }
    builder.line_to(point(l + bl.width, b));
    if !bl.is_zero() {
        builder.cubic_bezier_to(
            point(l + bl.width * (1.0 - KAPPA), b),
            point(l, b - bl.height * (1.0 - KAPPA)),
            point(l, b - bl.height),
        );
    }
    builder.line_to(point(l, t + tl.height));
    if !tl.is_zero() {
        builder.cubic_bezier_to(
            point(l, t + tl.height * (1.0 - KAPPA)),
            point(l + tl.width * (1.0 - KAPPA), t),
            point(l + tl.width, t),
        );
    }
    builder.end(true);
}

fn clamp_radius(radius: Radius, rect: &Rect) -> Radius {
    if radius.is_zero() {
        return Radius::ZERO;
    }
    Radius::new(radius.width.min(rect.width / 2.0), radius.height.min(rect.height / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_clip_contains() {
        let clip = ClipPath::from_size(Size::new(100.0, 50.0));
        assert!(clip.contains(Position::new(0.0, 0.0)));
        assert!(clip.contains(Position::new(100.0, 50.0)));
        assert!(!clip.contains(Position::new(101.0, 10.0)));
    }

    #[test]
    fn test_rounded_clip_excludes_corners() {
        let clip = ClipPath::rounded_rect(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            [Radius::circular(40.0); 4],
        );
        assert!(clip.contains(Position::new(50.0, 50.0)));
        assert!(clip.contains(Position::new(50.0, 2.0)));
        assert!(!clip.contains(Position::new(2.0, 2.0)));
        assert!(!clip.contains(Position::new(98.0, 98.0)));
    }

    #[test]
    fn test_zero_radii_collapse_to_rect() {
        let clip = ClipPath::rounded_rect(Rect::new(0.0, 0.0, 10.0, 10.0), [Radius::ZERO; 4]);
        assert!(matches!(clip.shape(), ClipShape::Rect(_)));
    }

    #[test]
    fn test_ring_path_even_odd() {
        let mut builder = Path::builder();
        let radii = [Radius::circular(10.0); 4];
        add_rounded_rect(&mut builder, &Rect::new(0.0, 0.0, 100.0, 100.0), &radii);
        add_rounded_rect(&mut builder, &Rect::new(10.0, 10.0, 80.0, 80.0), &[Radius::ZERO; 4]);
        let path = builder.build();
        let inside = |x: f32, y: f32| {
            hit_test_path(&point(x, y), path.iter(), FillRule::EvenOdd, HIT_TEST_TOLERANCE)
        };
        assert!(inside(5.0, 50.0));
        assert!(!inside(50.0, 50.0));
    }

    #[test]
    fn test_translated() {
        let clip = ClipPath::from_size(Size::new(10.0, 10.0)).translated(Position::new(20.0, 30.0));
        assert_eq!(clip.bounds(), Rect::new(20.0, 30.0, 10.0, 10.0));
        assert!(clip.contains(Position::new(25.0, 35.0)));
        assert!(!clip.contains(Position::new(5.0, 5.0)));
    }
}

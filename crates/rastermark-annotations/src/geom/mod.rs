//! Geometry primitives and helper algorithms.

use lyon::geom::euclid;
use serde::{Deserialize, Serialize};

mod cloud;
mod endings;
mod smoothing;
mod text_layout;

pub use cloud::{cloud_from_ellipse, cloud_from_polyline, cloud_path, CloudArc, DEFAULT_ARC_RATIO};
pub use endings::{ending_path, ending_size, LineEnding, LINE_END_MIN_SIZE, LINE_END_MULTIPLIER};
pub use smoothing::SmoothingBuffer;
pub use text_layout::{LayoutPivot, LineBox, MonospaceMeasure, TextMeasure};

/// 2D affine transform in image coordinates.
pub type Transform = euclid::default::Transform2D<f64>;
/// Angle wrapper used when composing rotations.
pub type Angle = euclid::Angle<f64>;

type EPoint = euclid::default::Point2D<f64>;
type EVector = euclid::default::Vector2D<f64>;

/// Control-point offset factor for approximating a circle with four cubics.
pub const BEZIER_CIRCLE_K: f64 = 0.551915;

/// A point in image-local coordinates.
///
/// Serializes as an `[x, y]` pair to match the persistence format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector from this point to `other`.
    pub fn vector_to(&self, other: &Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    /// Applies an affine transform to this point.
    pub fn transformed(&self, t: &Transform) -> Point {
        let p = t.transform_point(EPoint::new(self.x, self.y));
        Point::new(p.x, p.y)
    }

    /// Midpoint between this point and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Named corner of a [`BBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleName {
    LowerLeft,
    LowerRight,
    UpperRight,
    UpperLeft,
}

impl HandleName {
    /// The diagonally opposite corner, used as the scale pivot.
    pub fn opposite(self) -> HandleName {
        match self {
            HandleName::LowerLeft => HandleName::UpperRight,
            HandleName::LowerRight => HandleName::UpperLeft,
            HandleName::UpperRight => HandleName::LowerLeft,
            HandleName::UpperLeft => HandleName::LowerRight,
        }
    }

    /// The two corners adjacent to this one, in (horizontal, vertical)
    /// neighbor order.
    pub fn adjacent(self) -> (HandleName, HandleName) {
        match self {
            HandleName::LowerLeft => (HandleName::LowerRight, HandleName::UpperLeft),
            HandleName::LowerRight => (HandleName::LowerLeft, HandleName::UpperRight),
            HandleName::UpperRight => (HandleName::UpperLeft, HandleName::LowerRight),
            HandleName::UpperLeft => (HandleName::UpperRight, HandleName::LowerLeft),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandleName::LowerLeft => "ll",
            HandleName::LowerRight => "lr",
            HandleName::UpperRight => "ur",
            HandleName::UpperLeft => "ul",
        }
    }

    /// Parses the short name back from a host element (the inverse of
    /// [`as_str`](Self::as_str)).
    pub fn parse(name: &str) -> Result<Self, rastermark_core::AnnotationError> {
        match name {
            "ll" => Ok(HandleName::LowerLeft),
            "lr" => Ok(HandleName::LowerRight),
            "ur" => Ok(HandleName::UpperRight),
            "ul" => Ok(HandleName::UpperLeft),
            other => Err(rastermark_core::AnnotationError::UnknownHandle {
                name: other.to_string(),
            }),
        }
    }
}

/// Four-corner bounding box.
///
/// Corners are stored in lower-left, lower-right, upper-right, upper-left
/// order. The quadrilateral may itself be rotated; an axis-aligned box is
/// just the common case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub ll: Point,
    pub lr: Point,
    pub ur: Point,
    pub ul: Point,
}

impl BBox {
    /// Axis-aligned box from min/max coordinates ("lower" means greater y,
    /// matching the y-down image coordinate system).
    pub fn axis_aligned(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            ll: Point::new(min_x, max_y),
            lr: Point::new(max_x, max_y),
            ur: Point::new(max_x, min_y),
            ul: Point::new(min_x, min_y),
        }
    }

    /// Smallest axis-aligned box containing `points`, grown by `margin` on
    /// every side.
    pub fn around_points<'a, I>(points: I, margin: f64) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if min_x > max_x {
            // No points; degenerate box at the origin.
            return Self::axis_aligned(0.0, 0.0, 0.0, 0.0);
        }
        Self::axis_aligned(min_x - margin, min_y - margin, max_x + margin, max_y + margin)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.ll.x + self.lr.x + self.ur.x + self.ul.x) / 4.0,
            (self.ll.y + self.lr.y + self.ur.y + self.ul.y) / 4.0,
        )
    }

    pub fn corner(&self, name: HandleName) -> Point {
        match name {
            HandleName::LowerLeft => self.ll,
            HandleName::LowerRight => self.lr,
            HandleName::UpperRight => self.ur,
            HandleName::UpperLeft => self.ul,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }

    /// Transforms all four corners.
    pub fn transformed(&self, t: &Transform) -> BBox {
        BBox {
            ll: self.ll.transformed(t),
            lr: self.lr.transformed(t),
            ur: self.ur.transformed(t),
            ul: self.ul.transformed(t),
        }
    }

    /// Width along the lower edge.
    pub fn width(&self) -> f64 {
        self.ll.distance_to(&self.lr)
    }

    /// Height along the left edge.
    pub fn height(&self) -> f64 {
        self.ll.distance_to(&self.ul)
    }
}

/// Axis-aligned rectangle, used for clip regions and render extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Builds translate(-center) → rotate(angle) → translate(center).
pub fn rotate_about(angle: f64, center: Point) -> Transform {
    Transform::translation(-center.x, -center.y)
        .then_rotate(Angle::radians(angle))
        .then_translate(EVector::new(center.x, center.y))
}

/// Builds translate(-center) → scale(sx, sy) → translate(center).
pub fn scale_about(sx: f64, sy: f64, center: Point) -> Transform {
    Transform::translation(-center.x, -center.y)
        .then_scale(sx, sy)
        .then_translate(EVector::new(center.x, center.y))
}

/// Appends a pure translation to a transform.
pub fn then_translate(t: &Transform, dx: f64, dy: f64) -> Transform {
    t.then_translate(EVector::new(dx, dy))
}

/// Flattens a transform to row-major `[m11, m12, m21, m22, m31, m32]`.
pub fn transform_to_array(t: &Transform) -> [f64; 6] {
    [t.m11, t.m12, t.m21, t.m22, t.m31, t.m32]
}

/// Rebuilds a transform from its row-major array form.
pub fn transform_from_array(m: [f64; 6]) -> Transform {
    Transform::new(m[0], m[1], m[2], m[3], m[4], m[5])
}

/// Rotation angle contributed by a transform's linear part, in radians.
///
/// A negative determinant means the transform flips orientation; callers
/// that accumulate rotation negate in that case.
pub fn rotation_of(t: &Transform) -> f64 {
    t.m12.atan2(t.m11)
}

/// Scale factors along the transform's basis vectors (supports non-uniform
/// scaling).
pub fn scale_of(t: &Transform) -> (f64, f64) {
    let sx = (t.m11 * t.m11 + t.m12 * t.m12).sqrt();
    let sy = (t.m21 * t.m21 + t.m22 * t.m22).sqrt();
    (sx, sy)
}

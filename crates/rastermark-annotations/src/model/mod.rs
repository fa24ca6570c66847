//! Annotation model.
//!
//! [`Annotation`] owns identity, timestamps, authorship, the lazily cached
//! bounding box, and the common transform protocol. Shape-specific geometry
//! lives in the [`Shape`] variants, each contributing exactly two things to
//! the shared machinery: an appearance and a bounding box.

use std::cell::Cell;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rastermark_core::{AnnotationError, AnnotationEvent, EditCommand, EventBus};

use crate::geom::{
    self, BBox, HandleName, Point, Rect, Transform,
};
use crate::render::{
    Appearance, Color, HandleKind, HandlePlacement, RenderContext, RenderError, Renderer,
};

mod circle;
mod line;
mod note;
mod pen;
mod polygon;
mod polyline;
mod square;
mod stamp;
mod text;

pub use circle::CircleShape;
pub use line::{LeaderExtent, LineShape};
pub use note::NoteShape;
pub use pen::PenShape;
pub use polygon::PolygonShape;
pub use polyline::PolylineShape;
pub use square::SquareShape;
pub use stamp::{IconPath, IconRecipe, PathCmd, StampContent, StampShape};
pub use text::{Callout, TextShape};

/// How far the rotate handle sits above the box's upper edge.
const ROTATE_HANDLE_OFFSET: f64 = 24.0;

/// Applies an affine transform to a center/extent/rotation box description.
///
/// The center moves with the transform; rotation accumulates the transform's
/// angular part (negated under a flip); extents pick up the scale factors.
pub(crate) fn transform_box(
    t: &Transform,
    center: &mut Point,
    width: &mut f64,
    height: &mut f64,
    rotation: &mut f64,
) {
    *center = center.transformed(t);
    let delta = geom::rotation_of(t);
    if t.determinant() < 0.0 {
        *rotation -= delta;
    } else {
        *rotation += delta;
    }
    let (sx, sy) = geom::scale_of(t);
    *width *= sx;
    *height *= sy;
}

/// Stroke and fill styling shared by the shape variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    #[serde(default)]
    pub dash: Vec<f64>,
    #[serde(default)]
    pub fill: Option<Color>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
            dash: Vec::new(),
            fill: None,
        }
    }
}

/// Annotation type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    Circle,
    Square,
    Line,
    Polyline,
    Polygon,
    Text,
    Pen,
    Stamp,
    Note,
}

impl AnnotationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Circle => "circle",
            AnnotationKind::Square => "square",
            AnnotationKind::Line => "line",
            AnnotationKind::Polyline => "polyline",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::Text => "text",
            AnnotationKind::Pen => "pen",
            AnnotationKind::Stamp => "stamp",
            AnnotationKind::Note => "note",
        }
    }

    pub fn parse(kind: &str) -> Result<Self, AnnotationError> {
        match kind {
            "circle" => Ok(AnnotationKind::Circle),
            "square" => Ok(AnnotationKind::Square),
            "line" => Ok(AnnotationKind::Line),
            "polyline" => Ok(AnnotationKind::Polyline),
            "polygon" => Ok(AnnotationKind::Polygon),
            "text" => Ok(AnnotationKind::Text),
            "pen" => Ok(AnnotationKind::Pen),
            "stamp" => Ok(AnnotationKind::Stamp),
            "note" => Ok(AnnotationKind::Note),
            other => Err(AnnotationError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Shape-specific geometry payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(CircleShape),
    Square(SquareShape),
    Line(LineShape),
    Polyline(PolylineShape),
    Polygon(PolygonShape),
    Text(TextShape),
    Pen(PenShape),
    Stamp(StampShape),
    Note(NoteShape),
}

impl Shape {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Shape::Circle(_) => AnnotationKind::Circle,
            Shape::Square(_) => AnnotationKind::Square,
            Shape::Line(_) => AnnotationKind::Line,
            Shape::Polyline(_) => AnnotationKind::Polyline,
            Shape::Polygon(_) => AnnotationKind::Polygon,
            Shape::Text(_) => AnnotationKind::Text,
            Shape::Pen(_) => AnnotationKind::Pen,
            Shape::Stamp(_) => AnnotationKind::Stamp,
            Shape::Note(_) => AnnotationKind::Note,
        }
    }

    /// Applies an affine transform to the geometry in place.
    pub fn transform(&mut self, t: &Transform) {
        match self {
            Shape::Circle(s) => s.transform(t),
            Shape::Square(s) => s.transform(t),
            Shape::Line(s) => s.transform(t),
            Shape::Polyline(s) => s.transform(t),
            Shape::Polygon(s) => s.transform(t),
            Shape::Text(s) => s.transform(t),
            Shape::Pen(s) => s.transform(t),
            Shape::Stamp(s) => s.transform(t),
            Shape::Note(s) => s.transform(t),
        }
    }

    /// Recomputes the four-corner bounding box from current geometry.
    pub fn compute_aabb(&self) -> BBox {
        match self {
            Shape::Circle(s) => s.compute_aabb(),
            Shape::Square(s) => s.compute_aabb(),
            Shape::Line(s) => s.compute_aabb(),
            Shape::Polyline(s) => s.compute_aabb(),
            Shape::Polygon(s) => s.compute_aabb(),
            Shape::Text(s) => s.compute_aabb(),
            Shape::Pen(s) => s.compute_aabb(),
            Shape::Stamp(s) => s.compute_aabb(),
            Shape::Note(s) => s.compute_aabb(),
        }
    }

    /// Builds the visual form from current geometry and style.
    pub fn appearance(
        &self,
        ctx: &RenderContext<'_>,
        text: Option<&str>,
    ) -> Result<Appearance, RenderError> {
        match self {
            Shape::Circle(s) => s.appearance(ctx),
            Shape::Square(s) => s.appearance(ctx),
            Shape::Line(s) => s.appearance(ctx, text),
            Shape::Polyline(s) => s.appearance(ctx),
            Shape::Polygon(s) => s.appearance(ctx),
            Shape::Text(s) => s.appearance(ctx, text),
            Shape::Pen(s) => s.appearance(ctx),
            Shape::Stamp(s) => s.appearance(ctx),
            Shape::Note(s) => s.appearance(ctx),
        }
    }

    /// Variant-specific control handles.
    ///
    /// Box-like variants return `None` and get the shared corner-and-rotate
    /// shell; line and poly variants expose their vertices instead, so
    /// individual points can be dragged as structural edits.
    fn custom_handles(&self) -> Option<Vec<HandlePlacement>> {
        let vertex = |index: usize, at: Point| HandlePlacement {
            kind: HandleKind::Vertex(index),
            at,
        };
        let from_vertices = |vertices: &[Point]| {
            vertices
                .iter()
                .enumerate()
                .map(|(i, p)| vertex(i, *p))
                .collect()
        };
        match self {
            Shape::Line(s) => Some(vec![vertex(0, s.start), vertex(1, s.end)]),
            Shape::Polyline(s) => Some(from_vertices(&s.vertices)),
            Shape::Polygon(s) => Some(from_vertices(&s.vertices)),
            _ => None,
        }
    }

    /// Accumulated rotation in radians.
    ///
    /// Variants whose transforms are baked into their vertices report zero.
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Circle(s) => s.rotation,
            Shape::Square(s) => s.rotation,
            Shape::Text(s) => s.rotation(),
            Shape::Stamp(s) => s.rotation,
            Shape::Note(s) => s.rotation,
            Shape::Line(_) | Shape::Polyline(_) | Shape::Polygon(_) | Shape::Pen(_) => 0.0,
        }
    }
}

/// A single vector annotation over a raster image.
#[derive(Debug, Clone)]
pub struct Annotation {
    uuid: Uuid,
    image_uuid: Option<Uuid>,
    date_created: DateTime<Utc>,
    date_modified: DateTime<Utc>,
    author: String,
    deleted: bool,
    text_content: Option<String>,
    shape: Shape,
    aabb_cache: Cell<Option<BBox>>,
}

impl Annotation {
    /// Creates a fresh annotation, timestamped now.
    pub fn new(shape: Shape, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4(),
            image_uuid: None,
            date_created: now,
            date_modified: now,
            author: author.into(),
            deleted: false,
            text_content: None,
            shape,
            aabb_cache: Cell::new(None),
        }
    }

    /// Reconstructs an annotation from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        uuid: Uuid,
        image_uuid: Option<Uuid>,
        date_created: DateTime<Utc>,
        date_modified: DateTime<Utc>,
        author: String,
        deleted: bool,
        text_content: Option<String>,
        shape: Shape,
    ) -> Self {
        Self {
            uuid,
            image_uuid,
            date_created,
            date_modified,
            author,
            deleted,
            text_content,
            shape,
            aabb_cache: Cell::new(None),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn kind(&self) -> AnnotationKind {
        self.shape.kind()
    }

    pub fn image_uuid(&self) -> Option<Uuid> {
        self.image_uuid
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_modified(&self) -> DateTime<Utc> {
        self.date_modified
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
        self.date_modified = Utc::now();
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text_content.as_deref()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rotation(&self) -> f64 {
        self.shape.rotation()
    }

    /// Attaches the annotation to its owning image.
    ///
    /// The owning image is set exactly once; re-attachment is a contract
    /// error.
    pub fn attach_to(&mut self, image: Uuid) -> Result<(), AnnotationError> {
        if let Some(existing) = self.image_uuid {
            return Err(AnnotationError::AlreadyAttached {
                uuid: self.uuid,
                image: existing,
            });
        }
        self.image_uuid = Some(image);
        Ok(())
    }

    /// Structural edit entry point (e.g. moving a polygon vertex).
    ///
    /// Refreshes the modified timestamp and invalidates the bounding box.
    pub fn update_shape(&mut self, edit: impl FnOnce(&mut Shape)) {
        edit(&mut self.shape);
        self.touch();
    }

    /// The axis-aligned (possibly rotated-quad) bounding box, recomputed
    /// lazily after geometric mutation.
    pub fn aabb(&self) -> BBox {
        if let Some(cached) = self.aabb_cache.get() {
            return cached;
        }
        let fresh = self.shape.compute_aabb();
        self.aabb_cache.set(Some(fresh));
        fresh
    }

    /// Whether the next [`aabb`](Self::aabb) read will hit the cache.
    pub fn aabb_is_cached(&self) -> bool {
        self.aabb_cache.get().is_some()
    }

    fn touch(&mut self) {
        self.date_modified = Utc::now();
        self.aabb_cache.set(None);
    }

    /// The single choke point for all geometric mutation.
    ///
    /// Transforms the geometry, refreshes the modified timestamp,
    /// invalidates the bounding-box cache, and — when `undoable` — emits an
    /// edit-request carrying the inverse matrix. The event layer owns the
    /// undo stack, not this type.
    pub fn apply_common_transform(
        &mut self,
        t: &Transform,
        undoable: bool,
        bus: Option<&EventBus>,
    ) {
        let inverse = t.inverse();
        self.shape.transform(t);
        self.touch();

        if undoable {
            match inverse {
                Some(inverse) => {
                    if let Some(bus) = bus {
                        bus.publish(AnnotationEvent::EditRequested {
                            uuid: self.uuid,
                            undo: EditCommand::Transform {
                                uuid: self.uuid,
                                inverse: geom::transform_to_array(&inverse),
                            },
                        });
                    }
                }
                None => {
                    tracing::warn!(
                        annotation = %self.uuid,
                        "transform is not invertible, skipping undo emission"
                    );
                }
            }
        }
    }

    /// Translates the annotation so its bounding-box center lands on `point`.
    pub fn move_to(&mut self, point: Point, bus: Option<&EventBus>) {
        let center = self.aabb().center();
        let t = Transform::translation(point.x - center.x, point.y - center.y);
        self.apply_common_transform(&t, true, bus);
    }

    /// Rotates about `center` (default: current bounding-box center).
    pub fn rotate_by(&mut self, angle: f64, center: Option<Point>, bus: Option<&EventBus>) {
        let center = center.unwrap_or_else(|| self.aabb().center());
        let t = geom::rotate_about(angle, center);
        self.apply_common_transform(&t, true, bus);
    }

    /// Replaces the text content, emitting an edit-request whose undo
    /// restores the previous text.
    pub fn set_text_content(
        &mut self,
        text: Option<String>,
        undoable: bool,
        bus: Option<&EventBus>,
    ) {
        let previous = std::mem::replace(&mut self.text_content, text);
        self.date_modified = Utc::now();
        if undoable {
            if let Some(bus) = bus {
                bus.publish(AnnotationEvent::EditRequested {
                    uuid: self.uuid,
                    undo: EditCommand::SetText {
                        uuid: self.uuid,
                        previous,
                    },
                });
            }
        }
    }

    /// Builds the full appearance: shape paths, image clip, pick helpers.
    pub fn appearance(&self, ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let mut appearance = self
            .shape
            .appearance(ctx, self.text_content.as_deref())?
            .with_pick_helpers();
        appearance.clip = Some(Rect::new(0.0, 0.0, ctx.image.width, ctx.image.height));
        Ok(appearance)
    }

    /// Moves one structural vertex (addressed by its
    /// [`HandleKind::Vertex`] index) to `to`, refreshing the modified
    /// timestamp and invalidating the bounding box.
    ///
    /// Returns `false` when the shape has no such vertex; box-like variants
    /// have none and are edited through the common transform instead.
    pub fn move_vertex(&mut self, index: usize, to: Point) -> bool {
        let moved = match &mut self.shape {
            Shape::Line(s) => match index {
                0 => {
                    s.start = to;
                    true
                }
                1 => {
                    s.end = to;
                    true
                }
                _ => false,
            },
            Shape::Polyline(s) => match s.vertices.get_mut(index) {
                Some(v) => {
                    *v = to;
                    true
                }
                None => false,
            },
            Shape::Polygon(s) => match s.vertices.get_mut(index) {
                Some(v) => {
                    *v = to;
                    true
                }
                None => false,
            },
            _ => false,
        };
        if moved {
            self.touch();
        }
        moved
    }

    /// Control-handle placements: the shape's own vertex handles when it
    /// has them, otherwise the shared shell derived from the bounding box.
    pub fn control_handles(&self) -> Vec<HandlePlacement> {
        if let Some(handles) = self.shape.custom_handles() {
            return handles;
        }
        let bbox = self.aabb();
        let mut handles: Vec<HandlePlacement> = [
            HandleName::LowerLeft,
            HandleName::LowerRight,
            HandleName::UpperRight,
            HandleName::UpperLeft,
        ]
        .into_iter()
        .map(|name| HandlePlacement {
            kind: HandleKind::Corner(name),
            at: bbox.corner(name),
        })
        .collect();

        // Rotate handle above the upper edge, along its outward normal.
        let top_mid = bbox.ul.midpoint(&bbox.ur);
        let center = bbox.center();
        let (dx, dy) = center.vector_to(&top_mid);
        let len = (dx * dx + dy * dy).sqrt();
        let at = if len > 1e-9 {
            Point::new(
                top_mid.x + dx / len * ROTATE_HANDLE_OFFSET,
                top_mid.y + dy / len * ROTATE_HANDLE_OFFSET,
            )
        } else {
            Point::new(top_mid.x, top_mid.y - ROTATE_HANDLE_OFFSET)
        };
        handles.push(HandlePlacement {
            kind: HandleKind::Rotate,
            at,
        });
        handles
    }

    /// Renders controls and content through the injected renderer.
    ///
    /// Idempotent; a failed appearance is logged and skipped so one broken
    /// annotation never breaks its siblings. Tolerates being called before
    /// the annotation is attached to an image (tool previews).
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
    ) -> Option<Appearance> {
        match self.appearance(ctx) {
            Ok(appearance) => {
                renderer.mount_controls(self.uuid, &self.control_handles());
                renderer.update_content(self.uuid, &appearance);
                Some(appearance)
            }
            Err(err) => {
                tracing::warn!(annotation = %self.uuid, error = %err, "appearance failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_shapes_get_the_shared_handle_shell() {
        let annotation = Annotation::new(
            Shape::Square(SquareShape::new(
                Point::new(50.0, 50.0),
                40.0,
                20.0,
                StrokeStyle::default(),
            )),
            "tester",
        );
        let handles = annotation.control_handles();
        assert_eq!(handles.len(), 5);
        assert_eq!(handles[4].kind, HandleKind::Rotate);
        assert_eq!(handles[0].kind, HandleKind::Corner(HandleName::LowerLeft));
    }

    #[test]
    fn line_handles_are_its_endpoints() {
        let annotation = Annotation::new(
            Shape::Line(LineShape::new(
                Point::new(10.0, 20.0),
                Point::new(90.0, 40.0),
                StrokeStyle::default(),
            )),
            "tester",
        );
        let handles = annotation.control_handles();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].kind, HandleKind::Vertex(0));
        assert_eq!(handles[0].at, Point::new(10.0, 20.0));
        assert_eq!(handles[1].kind, HandleKind::Vertex(1));
        assert_eq!(handles[1].at, Point::new(90.0, 40.0));
    }

    #[test]
    fn polygon_vertex_drag_is_a_structural_edit() {
        let mut annotation = Annotation::new(
            Shape::Polygon(PolygonShape::new(
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(40.0, 0.0),
                    Point::new(20.0, 30.0),
                ],
                StrokeStyle::default(),
            )),
            "tester",
        );
        assert_eq!(annotation.control_handles().len(), 3);
        let stale = annotation.aabb();

        assert!(annotation.move_vertex(2, Point::new(20.0, 80.0)));
        assert!(!annotation.aabb_is_cached());
        let fresh = annotation.aabb();
        assert!(fresh.height() > stale.height());
        assert_eq!(annotation.control_handles()[2].at, Point::new(20.0, 80.0));

        // Out-of-range index leaves the geometry untouched.
        assert!(!annotation.move_vertex(3, Point::new(0.0, 0.0)));
        assert_eq!(annotation.aabb(), fresh);
    }

    #[test]
    fn vertex_moves_do_not_apply_to_box_shapes() {
        let mut annotation = Annotation::new(
            Shape::Note(NoteShape::new(Point::new(50.0, 50.0), 30.0, 30.0, Color::BLACK)),
            "tester",
        );
        assert!(!annotation.move_vertex(0, Point::new(0.0, 0.0)));
    }
}

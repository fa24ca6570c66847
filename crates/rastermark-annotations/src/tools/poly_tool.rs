//! Click-to-accumulate polyline / polygon creation tool.

use uuid::Uuid;

use rastermark_core::{AnnotationError, EventBus, ImageContext};

use crate::geom::Point;
use crate::interact::PointerEvent;
use crate::model::{Annotation, PolygonShape, PolylineShape, Shape};
use crate::store::ImageAnnotations;

use super::SessionStyle;

/// Click-accumulating vertex tool; `closed` selects polygon over polyline.
#[derive(Debug, Clone)]
pub struct PolyTool {
    closed: bool,
    points: Vec<Point>,
    bound: Option<Uuid>,
}

impl PolyTool {
    pub fn polyline() -> Self {
        Self {
            closed: false,
            points: Vec::new(),
            bound: None,
        }
    }

    pub fn polygon() -> Self {
        Self {
            closed: true,
            points: Vec::new(),
            bound: None,
        }
    }

    /// Adds a vertex at the click position. Clicking on a different image
    /// drops the draft and starts over there.
    pub fn add_point(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary {
            return;
        }
        if self.bound != Some(image.uuid) {
            if self.bound.is_some() {
                tracing::debug!("poly draft rebound to a different image, discarding");
            }
            self.points.clear();
            self.bound = Some(image.uuid);
        }
        self.points.push(event.image_point(image));
    }

    /// Removes the most recently added vertex.
    pub fn undo_point(&mut self) -> bool {
        self.points.pop().is_some()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The accumulated vertices, for drawing a draft preview.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Minimum vertex count for a savable draft.
    pub fn required_points(&self) -> usize {
        if self.closed {
            3
        } else {
            2
        }
    }

    /// Saves the draft as an annotation.
    ///
    /// A draft below the minimum vertex count is discarded silently and
    /// `None` is returned; the session simply continues.
    pub fn finish(
        &mut self,
        store: &mut ImageAnnotations,
        style: &SessionStyle,
        image: &ImageContext,
        bus: Option<&EventBus>,
    ) -> Result<Option<Uuid>, AnnotationError> {
        if self.bound != Some(store.image_uuid()) {
            self.clear();
            return Ok(None);
        }
        let points = std::mem::take(&mut self.points);
        self.bound = None;
        if points.len() < self.required_points() {
            tracing::debug!(
                vertices = points.len(),
                "poly draft below minimum vertex count, discarding"
            );
            return Ok(None);
        }
        let cloud = style.resolve_cloud(image);
        let shape = if self.closed {
            let mut s = PolygonShape::new(points, style.stroke.clone());
            s.cloud = cloud;
            Shape::Polygon(s)
        } else {
            let mut s = PolylineShape::new(points, style.stroke.clone());
            s.cloud = cloud;
            Shape::Polyline(s)
        };
        let annotation = Annotation::new(shape, style.author.clone());
        store.attach(annotation, bus).map(Some)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.bound = None;
    }
}

//! Press-drag-release line creation tool.

use uuid::Uuid;

use rastermark_core::{AnnotationError, EventBus, ImageContext};

use crate::geom::{LineEnding, Point};
use crate::interact::PointerEvent;
use crate::model::{Annotation, LeaderExtent, LineShape, Shape};
use crate::store::ImageAnnotations;

use super::SessionStyle;

/// Lines shorter than this are treated as accidental taps.
const MIN_LENGTH: f64 = 2.0;

/// Two-point line tool, configurable with endings and measurement leaders.
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    pub ending_start: LineEnding,
    pub ending_end: LineEnding,
    pub leader: Option<LeaderExtent>,
    draft: Option<(Point, Uuid)>,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary {
            return;
        }
        self.draft = Some((event.image_point(image), image.uuid));
    }

    /// Finishes the line; too-short drafts are discarded silently.
    pub fn pointer_up(
        &mut self,
        store: &mut ImageAnnotations,
        style: &SessionStyle,
        image: &ImageContext,
        bus: Option<&EventBus>,
        event: &PointerEvent,
    ) -> Result<Option<Uuid>, AnnotationError> {
        let Some((start, bound)) = self.draft.take() else {
            return Ok(None);
        };
        if bound != store.image_uuid() || bound != image.uuid {
            return Ok(None);
        }
        let end = event.image_point(image);
        if start.distance_to(&end) < MIN_LENGTH {
            tracing::debug!("degenerate line draft discarded");
            return Ok(None);
        }
        let mut shape = LineShape::new(start, end, style.stroke.clone());
        shape.ending_start = self.ending_start;
        shape.ending_end = self.ending_end;
        shape.leader = self.leader;
        let annotation = Annotation::new(Shape::Line(shape), style.author.clone());
        store.attach(annotation, bus).map(Some)
    }

    pub fn clear(&mut self) {
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_creates_a_line_with_configured_endings() {
        let image = ImageContext::new(Uuid::new_v4(), 300.0, 300.0);
        let mut store = ImageAnnotations::new(image.uuid);
        let style = SessionStyle::default();

        let mut tool = LineTool::new();
        tool.ending_end = LineEnding::OpenArrow;
        tool.pointer_down(&image, &PointerEvent::new(10.0, 10.0, 0.0));
        let uuid = tool
            .pointer_up(
                &mut store,
                &style,
                &image,
                None,
                &PointerEvent::new(90.0, 10.0, 400.0),
            )
            .unwrap()
            .unwrap();

        let Shape::Line(shape) = store.get(uuid).unwrap().shape() else {
            panic!("expected a line");
        };
        assert_eq!(shape.ending_end, LineEnding::OpenArrow);
        assert!((shape.length() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn tap_creates_nothing() {
        let image = ImageContext::new(Uuid::new_v4(), 300.0, 300.0);
        let mut store = ImageAnnotations::new(image.uuid);
        let style = SessionStyle::default();

        let mut tool = LineTool::new();
        tool.pointer_down(&image, &PointerEvent::new(10.0, 10.0, 0.0));
        let result = tool
            .pointer_up(
                &mut store,
                &style,
                &image,
                None,
                &PointerEvent::new(10.5, 10.0, 100.0),
            )
            .unwrap();
        assert!(result.is_none());
        assert!(store.is_empty());
    }
}

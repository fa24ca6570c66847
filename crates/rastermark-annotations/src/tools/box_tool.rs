//! Drag-a-box creation tool for square, circle, note, and stamp annotations.

use uuid::Uuid;

use rastermark_core::{AnnotationError, EventBus, ImageContext};

use crate::geom::Point;
use crate::interact::PointerEvent;
use crate::model::{
    Annotation, CircleShape, NoteShape, Shape, SquareShape, StampContent, StampShape,
};
use crate::render::Color;
use crate::store::ImageAnnotations;

use super::SessionStyle;

/// Boxes smaller than this on either axis are treated as accidental taps.
const MIN_EXTENT: f64 = 2.0;

/// Which annotation a finished box drag produces.
#[derive(Debug, Clone)]
pub enum BoxKind {
    Square,
    Circle,
    Note { color: Color },
    Stamp { content: StampContent },
}

/// Press-drag-release box tool.
#[derive(Debug, Clone)]
pub struct BoxTool {
    kind: BoxKind,
    draft: Option<(Point, Uuid)>,
}

impl BoxTool {
    pub fn new(kind: BoxKind) -> Self {
        Self { kind, draft: None }
    }

    /// Starts a drag. A fresh press replaces the draft outright, so one
    /// left over on another image is dropped here.
    pub fn pointer_down(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary {
            return;
        }
        if let Some((_, bound)) = self.draft.take() {
            if bound != image.uuid {
                tracing::debug!("box draft left on another image, discarded");
            }
        }
        self.draft = Some((event.image_point(image), image.uuid));
    }

    /// Finishes the drag.
    ///
    /// Returns the new annotation's uuid, or `None` when the draft was
    /// degenerate or bound to a different image.
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
        let width = (end.x - start.x).abs();
        let height = (end.y - start.y).abs();
        if width < MIN_EXTENT || height < MIN_EXTENT {
            tracing::debug!("degenerate box draft discarded");
            return Ok(None);
        }
        let center = start.midpoint(&end);

        let shape = match &self.kind {
            BoxKind::Square => {
                let mut s = SquareShape::new(center, width, height, style.stroke.clone());
                s.cloud = style.resolve_cloud(image);
                Shape::Square(s)
            }
            BoxKind::Circle => {
                let mut s =
                    CircleShape::new(center, width / 2.0, height / 2.0, style.stroke.clone());
                s.cloud = style.resolve_cloud(image);
                Shape::Circle(s)
            }
            BoxKind::Note { color } => Shape::Note(NoteShape::new(center, width, height, *color)),
            BoxKind::Stamp { content } => {
                Shape::Stamp(StampShape::new(center, width, height, content.clone()))
            }
        };

        let annotation = Annotation::new(shape, style.author.clone());
        store.attach(annotation, bus).map(Some)
    }

    /// Discards any in-flight draft.
    pub fn clear(&mut self) {
        self.draft = None;
    }
}

//! Text-box creation tool.
//!
//! A drag defines the box; a plain click gets a default-sized box at the
//! click point. The annotation starts with empty text; the host opens its
//! editor and commits content through
//! [`crate::model::Annotation::set_text_content`].

use uuid::Uuid;

use rastermark_core::{AnnotationError, EventBus, ImageContext};

use crate::geom::{BBox, Point};
use crate::interact::PointerEvent;
use crate::model::{Annotation, Callout, Shape, TextShape};
use crate::render::Color;
use crate::store::ImageAnnotations;

use super::SessionStyle;

/// Drags smaller than this fall back to the default box size.
const MIN_EXTENT: f64 = 8.0;
const DEFAULT_WIDTH: f64 = 120.0;
const DEFAULT_HEIGHT: f64 = 40.0;

/// Press-drag-release (or click) text tool.
#[derive(Debug, Clone)]
pub struct TextTool {
    /// Attach a callout arm pointing at the press position.
    pub with_callout: bool,
    pub text_color: Color,
    draft: Option<(Point, Uuid)>,
}

impl TextTool {
    pub fn new() -> Self {
        Self {
            with_callout: false,
            text_color: Color::BLACK,
            draft: None,
        }
    }

    pub fn pointer_down(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary {
            return;
        }
        self.draft = Some((event.image_point(image), image.uuid));
    }

    /// Finishes the box and attaches an empty text annotation.
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

        let bbox = if (end.x - start.x).abs() < MIN_EXTENT || (end.y - start.y).abs() < MIN_EXTENT
        {
            BBox::axis_aligned(
                start.x,
                start.y,
                start.x + DEFAULT_WIDTH,
                start.y + DEFAULT_HEIGHT,
            )
        } else {
            BBox::axis_aligned(
                start.x.min(end.x),
                start.y.min(end.y),
                start.x.max(end.x),
                start.y.max(end.y),
            )
        };

        let mut shape = TextShape::new(bbox, style.font_size, style.stroke.clone(), self.text_color);
        if self.with_callout {
            // Arm from the box's left edge out to the press position.
            let base = Point::new(bbox.ul.x, bbox.center().y);
            let pointer = start;
            let knee = Point::new((base.x + pointer.x) / 2.0, pointer.y);
            shape.callout = Some(Callout {
                base,
                knee,
                pointer,
                ending: crate::geom::LineEnding::ClosedArrow,
            });
        }

        let annotation = Annotation::new(Shape::Text(shape), style.author.clone());
        store.attach(annotation, bus).map(Some)
    }

    pub fn clear(&mut self) {
        self.draft = None;
    }
}

impl Default for TextTool {
    fn default() -> Self {
        Self::new()
    }
}

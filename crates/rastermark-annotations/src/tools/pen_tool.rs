//! Freehand pen tool with live smoothing.
//!
//! While the pointer is down, raw samples feed the smoothing window. The
//! committed prefix is stable; a transient tail of progressively shorter
//! trailing averages keeps the preview glued to the cursor. On release the
//! tail is folded into the stroke so nothing visible is lost.

use uuid::Uuid;

use rastermark_core::{AnnotationError, EventBus, ImageContext};

use crate::geom::SmoothingBuffer;
use crate::interact::PointerEvent;
use crate::model::{Annotation, PenShape, Shape};
use crate::store::ImageAnnotations;

use super::SessionStyle;

/// Multi-stroke freehand tool.
#[derive(Debug, Clone)]
pub struct PenTool {
    buffer: SmoothingBuffer,
    committed: Vec<[f64; 2]>,
    strokes: Vec<Vec<[f64; 2]>>,
    drawing: bool,
    bound: Option<Uuid>,
}

impl PenTool {
    pub fn new() -> Self {
        Self {
            buffer: SmoothingBuffer::new(),
            committed: Vec::new(),
            strokes: Vec::new(),
            drawing: false,
            bound: None,
        }
    }

    /// Starts a stroke. Drawing on a different image drops everything
    /// accumulated so far.
    pub fn pointer_down(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary {
            return;
        }
        if self.bound != Some(image.uuid) {
            if self.bound.is_some() {
                tracing::debug!("pen draft rebound to a different image, discarding");
            }
            self.strokes.clear();
            self.bound = Some(image.uuid);
        }
        self.buffer.reset();
        self.committed.clear();
        self.drawing = true;
        self.feed(image, event);
    }

    pub fn pointer_move(&mut self, image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary || !self.drawing {
            return;
        }
        self.feed(image, event);
    }

    /// Ends the stroke, folding the unstable tail into it.
    pub fn pointer_up(&mut self, _image: &ImageContext, event: &PointerEvent) {
        if !event.is_primary || !self.drawing {
            return;
        }
        self.drawing = false;
        let mut stroke = std::mem::take(&mut self.committed);
        stroke.extend(self.buffer.unstable_tail());
        self.buffer.reset();
        if stroke.len() >= 2 {
            self.strokes.push(stroke);
        }
    }

    fn feed(&mut self, image: &ImageContext, event: &PointerEvent) {
        let p = event.image_point(image);
        if let Some(smoothed) = self.buffer.push(p.x, p.y) {
            self.committed.push(smoothed);
        }
    }

    /// The stroke as currently visible: committed prefix plus unstable tail.
    pub fn preview(&self) -> Vec<[f64; 2]> {
        let mut points = self.committed.clone();
        points.extend(self.buffer.unstable_tail());
        points
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Saves the accumulated strokes as one pen annotation.
    pub fn finish(
        &mut self,
        store: &mut ImageAnnotations,
        style: &SessionStyle,
        bus: Option<&EventBus>,
    ) -> Result<Option<Uuid>, AnnotationError> {
        if self.bound != Some(store.image_uuid()) {
            self.clear();
            return Ok(None);
        }
        let strokes = std::mem::take(&mut self.strokes);
        self.bound = None;
        if strokes.is_empty() {
            return Ok(None);
        }
        let annotation = Annotation::new(
            Shape::Pen(PenShape::new(strokes, style.stroke.clone())),
            style.author.clone(),
        );
        store.attach(annotation, bus).map(Some)
    }

    pub fn clear(&mut self) {
        self.buffer.reset();
        self.committed.clear();
        self.strokes.clear();
        self.drawing = false;
        self.bound = None;
    }
}

impl Default for PenTool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_survives_pointer_up_and_finish() {
        let image = ImageContext::new(Uuid::new_v4(), 300.0, 300.0);
        let mut store = ImageAnnotations::new(image.uuid);
        let style = SessionStyle::default();

        let mut tool = PenTool::new();
        tool.pointer_down(&image, &PointerEvent::new(10.0, 10.0, 0.0));
        for i in 1..10 {
            let t = i as f64 * 16.0;
            tool.pointer_move(&image, &PointerEvent::new(10.0 + i as f64 * 5.0, 10.0, t));
        }
        tool.pointer_up(&image, &PointerEvent::new(55.0, 10.0, 200.0));
        assert_eq!(tool.stroke_count(), 1);

        let uuid = tool.finish(&mut store, &style, None).unwrap().unwrap();
        let Shape::Pen(shape) = store.get(uuid).unwrap().shape() else {
            panic!("expected a pen");
        };
        // Tail folding keeps the stroke's end at the raw cursor position.
        let last = shape.strokes[0].last().unwrap();
        assert!((last[0] - 55.0).abs() < 1e-9);
    }

    #[test]
    fn preview_tracks_the_cursor_before_commit() {
        let image = ImageContext::new(Uuid::new_v4(), 300.0, 300.0);
        let mut tool = PenTool::new();
        tool.pointer_down(&image, &PointerEvent::new(0.0, 0.0, 0.0));
        tool.pointer_move(&image, &PointerEvent::new(10.0, 0.0, 16.0));
        let preview = tool.preview();
        assert_eq!(preview.last(), Some(&[10.0, 0.0]));
    }
}

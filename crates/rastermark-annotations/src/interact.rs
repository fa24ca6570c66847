//! Pointer-driven transform gestures.
//!
//! A gesture is a small state machine fed with pointer events whose
//! timestamps the caller supplies, so arming is a pure function of the event
//! stream and fully testable without timers. A press arms the gesture; only
//! a move arriving after the arming delay starts an actual drag, so a quick
//! tap (select) never mutates geometry. While dragging, a ghost copy of the
//! annotation previews the pending transform; the real geometry is touched
//! exactly once, on release.

use rastermark_core::{EventBus, ImageContext};

use crate::geom::{self, BBox, HandleName, Point, Transform};
use crate::model::Annotation;
use crate::render::{RenderContext, Renderer};

/// Milliseconds a press must age before a move starts dragging.
pub const ARMING_DELAY_MS: f64 = 200.0;

/// Degenerate-box guard for scale gestures.
const MIN_EDGE_LENGTH: f64 = 1e-6;

/// A pointer event in client coordinates with a caller-supplied clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub timestamp_ms: f64,
    pub is_primary: bool,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64, timestamp_ms: f64) -> Self {
        Self {
            client_x,
            client_y,
            timestamp_ms,
            is_primary: true,
        }
    }

    pub(crate) fn image_point(&self, image: &ImageContext) -> Point {
        let (x, y) = image.client_to_image(self.client_x, self.client_y);
        Point::new(x, y)
    }
}

/// What a gesture does to the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Drag the body.
    Translate,
    /// Drag the rotate handle.
    Rotate,
    /// Drag a corner handle; the named corner moves, its diagonal opposite
    /// stays fixed.
    Scale(HandleName),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Armed {
        since_ms: f64,
        start: Point,
        base: BBox,
    },
    Dragging {
        start: Point,
        base: BBox,
        current: Transform,
    },
}

/// One in-flight transform gesture over one annotation.
#[derive(Debug, Clone)]
pub struct TransformGesture {
    kind: GestureKind,
    phase: Phase,
}

impl TransformGesture {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// Whether the arming delay has elapsed and geometry is being previewed.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Whether a press has been registered (armed or dragging).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Arms the gesture. Non-primary pointers and re-presses while a gesture
    /// is in flight are ignored.
    pub fn pointer_down(
        &mut self,
        annotation: &Annotation,
        image: &ImageContext,
        event: &PointerEvent,
    ) {
        if !event.is_primary || self.is_active() {
            return;
        }
        self.phase = Phase::Armed {
            since_ms: event.timestamp_ms,
            start: event.image_point(image),
            base: annotation.aabb(),
        };
    }

    /// Advances the gesture. The first move after the arming delay shows the
    /// ghost; later moves reposition it. Moves inside the delay window are
    /// ignored, keeping a quick tap side-effect free.
    pub fn pointer_move(
        &mut self,
        annotation: &Annotation,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
        event: &PointerEvent,
    ) {
        if !event.is_primary {
            return;
        }
        match self.phase {
            Phase::Idle => {}
            Phase::Armed {
                since_ms,
                start,
                base,
            } => {
                if event.timestamp_ms - since_ms < ARMING_DELAY_MS {
                    return;
                }
                tracing::debug!(
                    annotation = %annotation.uuid(),
                    kind = ?self.kind,
                    "gesture armed, drag begins"
                );
                if let Ok(appearance) = annotation.appearance(ctx) {
                    renderer.show_ghost(annotation.uuid(), &appearance);
                }
                let current = self.compute(start, event.image_point(ctx.image), &base);
                renderer.move_ghost(annotation.uuid(), geom::transform_to_array(&current));
                self.phase = Phase::Dragging {
                    start,
                    base,
                    current,
                };
            }
            Phase::Dragging { start, base, .. } => {
                let current = self.compute(start, event.image_point(ctx.image), &base);
                renderer.move_ghost(annotation.uuid(), geom::transform_to_array(&current));
                self.phase = Phase::Dragging {
                    start,
                    base,
                    current,
                };
            }
        }
    }

    /// Finishes the gesture.
    ///
    /// A drag commits the accumulated transform to the annotation (emitting
    /// the undoable edit request), re-renders the content where the ghost
    /// was, and returns `true`; a tap that never left the arming window
    /// resets with zero side effects and returns `false`.
    pub fn pointer_up(
        &mut self,
        annotation: &mut Annotation,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
        bus: Option<&EventBus>,
        event: &PointerEvent,
    ) -> bool {
        if !event.is_primary {
            return false;
        }
        let committed = match self.phase {
            Phase::Dragging { current, .. } => {
                renderer.remove_ghost(annotation.uuid());
                annotation.apply_common_transform(&current, true, bus);
                annotation.render(ctx, renderer);
                tracing::debug!(
                    annotation = %annotation.uuid(),
                    kind = ?self.kind,
                    "gesture committed"
                );
                true
            }
            _ => false,
        };
        self.phase = Phase::Idle;
        committed
    }

    /// Abandons the gesture without touching the annotation.
    pub fn cancel(&mut self, annotation: &Annotation, renderer: &mut dyn Renderer) {
        if self.is_dragging() {
            renderer.remove_ghost(annotation.uuid());
        }
        self.phase = Phase::Idle;
    }

    fn compute(&self, start: Point, current: Point, base: &BBox) -> Transform {
        match self.kind {
            GestureKind::Translate => {
                Transform::translation(current.x - start.x, current.y - start.y)
            }
            GestureKind::Rotate => {
                let center = base.center();
                let (sx, sy) = center.vector_to(&start);
                let (cx, cy) = center.vector_to(&current);
                let delta = cy.atan2(cx) - sy.atan2(sx);
                geom::rotate_about(delta, center)
            }
            GestureKind::Scale(handle) => scale_transform(handle, current, base),
        }
    }
}

/// Builds the scale transform for a corner drag.
///
/// The pointer position is decomposed against the edges meeting at the fixed
/// pivot corner: projecting onto the horizontal edge gives the new width, the
/// Pythagorean remainder gives the new height, so the decomposition stays
/// valid for rotated boxes. Scaling happens about the box center; a final
/// pivot-correction translation puts the pivot corner back where it was.
fn scale_transform(handle: HandleName, pointer: Point, base: &BBox) -> Transform {
    let pivot_name = handle.opposite();
    let pivot = base.corner(pivot_name);
    let (h_name, v_name) = pivot_name.adjacent();
    let (ex_x, ex_y) = pivot.vector_to(&base.corner(h_name));
    let (ey_x, ey_y) = pivot.vector_to(&base.corner(v_name));
    let len_x = (ex_x * ex_x + ex_y * ex_y).sqrt();
    let len_y = (ey_x * ey_x + ey_y * ey_y).sqrt();
    if len_x < MIN_EDGE_LENGTH || len_y < MIN_EDGE_LENGTH {
        return Transform::identity();
    }

    let (cur_x, cur_y) = pivot.vector_to(&pointer);
    let cur_len = (cur_x * cur_x + cur_y * cur_y).sqrt();
    if cur_len < MIN_EDGE_LENGTH {
        return Transform::identity();
    }

    let x_side = (cur_x * ex_x + cur_y * ex_y).abs() / len_x;
    let y_side = (cur_len * cur_len - x_side * x_side).max(0.0).sqrt();
    let sx = x_side / len_x;
    let sy = y_side / len_y;

    let scaled = geom::scale_about(sx, sy, base.center());
    let moved_pivot = pivot.transformed(&scaled);
    geom::then_translate(&scaled, pivot.x - moved_pivot.x, pivot.y - moved_pivot.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Shape, SquareShape, StrokeStyle};
    use crate::render::NoopRenderer;
    use rastermark_core::AnnotationEvent;
    use uuid::Uuid;

    fn square_annotation() -> Annotation {
        Annotation::new(
            Shape::Square(SquareShape::new(
                Point::new(50.0, 50.0),
                40.0,
                20.0,
                StrokeStyle::default(),
            )),
            "tester",
        )
    }

    fn ctx_parts() -> (ImageContext, crate::geom::MonospaceMeasure) {
        (
            ImageContext::new(Uuid::new_v4(), 200.0, 200.0),
            crate::geom::MonospaceMeasure::default(),
        )
    }

    #[test]
    fn quick_tap_is_a_no_op() {
        let (image, measure) = ctx_parts();
        let ctx = RenderContext {
            image: &image,
            text_measure: &measure,
        };
        let mut renderer = NoopRenderer;
        let mut annotation = square_annotation();
        let before = annotation.aabb();

        let bus = EventBus::new();
        let events = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = events.clone();
        bus.subscribe(move |_| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        let mut gesture = TransformGesture::new(GestureKind::Translate);
        gesture.pointer_down(&annotation, &image, &PointerEvent::new(50.0, 50.0, 0.0));
        gesture.pointer_move(
            &annotation,
            &ctx,
            &mut renderer,
            &PointerEvent::new(60.0, 60.0, 100.0),
        );
        let committed = gesture.pointer_up(
            &mut annotation,
            &ctx,
            &mut renderer,
            Some(&bus),
            &PointerEvent::new(60.0, 60.0, 150.0),
        );

        assert!(!committed);
        assert_eq!(annotation.aabb(), before);
        assert_eq!(events.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn drag_after_delay_commits_translation() {
        let (image, measure) = ctx_parts();
        let ctx = RenderContext {
            image: &image,
            text_measure: &measure,
        };
        let mut renderer = NoopRenderer;
        let mut annotation = square_annotation();

        let bus = EventBus::new();
        let undos = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = undos.clone();
        bus.subscribe(move |event| {
            if let AnnotationEvent::EditRequested { undo, .. } = event {
                sink.lock().push(undo.clone());
            }
        });

        let mut gesture = TransformGesture::new(GestureKind::Translate);
        gesture.pointer_down(&annotation, &image, &PointerEvent::new(50.0, 50.0, 0.0));
        gesture.pointer_move(
            &annotation,
            &ctx,
            &mut renderer,
            &PointerEvent::new(80.0, 50.0, 250.0),
        );
        assert!(gesture.is_dragging());
        let committed = gesture.pointer_up(
            &mut annotation,
            &ctx,
            &mut renderer,
            Some(&bus),
            &PointerEvent::new(80.0, 50.0, 260.0),
        );

        assert!(committed);
        let center = annotation.aabb().center();
        assert!((center.x - 80.0).abs() < 1e-9);
        assert!((center.y - 50.0).abs() < 1e-9);
        assert_eq!(undos.lock().len(), 1);
    }

    /// Renderer that counts calls, for asserting on the commit sequence.
    #[derive(Debug, Default)]
    struct CountingRenderer {
        content_updates: usize,
        ghosts_shown: usize,
        ghosts_removed: usize,
    }

    impl Renderer for CountingRenderer {
        fn mount_controls(&mut self, _uuid: Uuid, _handles: &[crate::render::HandlePlacement]) {}
        fn update_content(&mut self, _uuid: Uuid, _appearance: &crate::render::Appearance) {
            self.content_updates += 1;
        }
        fn show_ghost(&mut self, _uuid: Uuid, _appearance: &crate::render::Appearance) {
            self.ghosts_shown += 1;
        }
        fn move_ghost(&mut self, _uuid: Uuid, _matrix: [f64; 6]) {}
        fn remove_ghost(&mut self, _uuid: Uuid) {
            self.ghosts_removed += 1;
        }
        fn remove(&mut self, _uuid: Uuid) {}
    }

    #[test]
    fn commit_refreshes_the_content_where_the_ghost_was() {
        let (image, measure) = ctx_parts();
        let ctx = RenderContext {
            image: &image,
            text_measure: &measure,
        };
        let mut renderer = CountingRenderer::default();
        let mut annotation = square_annotation();

        let mut gesture = TransformGesture::new(GestureKind::Translate);
        gesture.pointer_down(&annotation, &image, &PointerEvent::new(50.0, 50.0, 0.0));
        gesture.pointer_move(
            &annotation,
            &ctx,
            &mut renderer,
            &PointerEvent::new(70.0, 50.0, 250.0),
        );
        assert_eq!(renderer.ghosts_shown, 1);
        assert_eq!(renderer.content_updates, 0);

        assert!(gesture.pointer_up(
            &mut annotation,
            &ctx,
            &mut renderer,
            None,
            &PointerEvent::new(70.0, 50.0, 260.0),
        ));
        // The committed geometry replaces the ghost immediately; nothing
        // stays stale until the next full layer render.
        assert_eq!(renderer.ghosts_removed, 1);
        assert_eq!(renderer.content_updates, 1);
    }

    #[test]
    fn scale_keeps_opposite_corner_fixed() {
        let annotation = square_annotation();
        let base = annotation.aabb();
        for handle in [
            HandleName::LowerLeft,
            HandleName::LowerRight,
            HandleName::UpperRight,
            HandleName::UpperLeft,
        ] {
            let pivot = base.corner(handle.opposite());
            let dragged = base.corner(handle);
            // Drag the corner outward, away from the pivot.
            let target = Point::new(
                pivot.x + (dragged.x - pivot.x) * 1.5,
                pivot.y + (dragged.y - pivot.y) * 1.3,
            );
            let t = scale_transform(handle, target, &base);
            let moved_pivot = pivot.transformed(&t);
            assert!((moved_pivot.x - pivot.x).abs() < 1e-9, "{handle:?}");
            assert!((moved_pivot.y - pivot.y).abs() < 1e-9, "{handle:?}");
        }
    }

    #[test]
    fn rotation_drag_composes_with_existing_rotation() {
        let (image, measure) = ctx_parts();
        let ctx = RenderContext {
            image: &image,
            text_measure: &measure,
        };
        let mut renderer = NoopRenderer;
        let mut annotation = square_annotation();
        annotation.rotate_by(0.2, None, None);

        let mut gesture = TransformGesture::new(GestureKind::Rotate);
        // Start directly right of the center, drag to directly below it: a
        // quarter turn in y-down coordinates.
        gesture.pointer_down(&annotation, &image, &PointerEvent::new(90.0, 50.0, 0.0));
        gesture.pointer_move(
            &annotation,
            &ctx,
            &mut renderer,
            &PointerEvent::new(50.0, 90.0, 300.0),
        );
        gesture.pointer_up(
            &mut annotation,
            &ctx,
            &mut renderer,
            None,
            &PointerEvent::new(50.0, 90.0, 310.0),
        );

        assert!((annotation.rotation() - (0.2 + std::f64::consts::FRAC_PI_2)).abs() < 1e-9);
    }
}

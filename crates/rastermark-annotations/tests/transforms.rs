//! Transform protocol invariants: lazy bounding boxes, undo matrices, and
//! composed gestures.

use std::sync::Arc;

use parking_lot::Mutex;
use rastermark_annotations::geom::{self, HandleName, Point, Transform};
use rastermark_annotations::model::{Annotation, Shape, SquareShape, StrokeStyle};
use rastermark_annotations::render::{NoopRenderer, RenderContext};
use rastermark_annotations::{GestureKind, PointerEvent, TransformGesture};
use rastermark_core::{AnnotationEvent, EditCommand, EventBus, ImageContext};
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

fn assert_close(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
    assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn aabb_is_computed_lazily_and_invalidated_by_mutation() {
    let mut annotation = square_annotation();
    assert!(!annotation.aabb_is_cached());

    let first = annotation.aabb();
    assert!(annotation.aabb_is_cached());
    assert_eq!(annotation.aabb(), first);

    annotation.apply_common_transform(&Transform::translation(5.0, 0.0), false, None);
    assert!(!annotation.aabb_is_cached());
    let second = annotation.aabb();
    assert_close(second.center(), Point::new(55.0, 50.0));
    assert!(annotation.aabb_is_cached());
}

#[test]
fn emitted_undo_matrix_reverts_the_edit() {
    let bus = EventBus::new();
    let undos: Arc<Mutex<Vec<EditCommand>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = undos.clone();
    bus.subscribe(move |event| {
        if let AnnotationEvent::EditRequested { undo, .. } = event {
            sink.lock().push(undo.clone());
        }
    });

    let mut annotation = square_annotation();
    let before = annotation.aabb();

    let edit = geom::rotate_about(0.7, Point::new(10.0, 10.0))
        .then(&Transform::scale(1.5, 1.5))
        .then(&Transform::translation(3.0, -4.0));
    annotation.apply_common_transform(&edit, true, Some(&bus));
    assert!(annotation.aabb() != before);

    let undos = undos.lock();
    let EditCommand::Transform { uuid, inverse } = &undos[0] else {
        panic!("expected a transform undo");
    };
    assert_eq!(*uuid, annotation.uuid());

    annotation.apply_common_transform(&geom::transform_from_array(*inverse), false, None);
    let after = annotation.aabb();
    assert_close(after.center(), before.center());
    assert_close(after.ll, before.ll);
}

#[test]
fn successive_rotations_compose_additively() {
    let mut annotation = square_annotation();
    annotation.rotate_by(0.4, None, None);
    annotation.rotate_by(0.25, None, None);
    assert!((annotation.rotation() - 0.65).abs() < 1e-9);
}

#[test]
fn scale_gesture_pins_the_opposite_corner_through_commit() {
    let image = ImageContext::new(Uuid::new_v4(), 400.0, 400.0);
    let measure = rastermark_annotations::geom::MonospaceMeasure::default();
    let ctx = RenderContext {
        image: &image,
        text_measure: &measure,
    };
    let mut renderer = NoopRenderer;

    // Zero stroke width keeps the bounding box congruent with the shape, so
    // the pivot assertions are exact.
    let hairline = StrokeStyle {
        width: 0.0,
        ..StrokeStyle::default()
    };

    for handle in [
        HandleName::LowerLeft,
        HandleName::LowerRight,
        HandleName::UpperRight,
        HandleName::UpperLeft,
    ] {
        let mut annotation = Annotation::new(
            Shape::Square(SquareShape::new(
                Point::new(50.0, 50.0),
                40.0,
                20.0,
                hairline.clone(),
            )),
            "tester",
        );
        let base = annotation.aabb();
        let pivot = base.corner(handle.opposite());
        let dragged = base.corner(handle);
        let target = Point::new(
            pivot.x + (dragged.x - pivot.x) * 2.0,
            pivot.y + (dragged.y - pivot.y) * 1.5,
        );

        let mut gesture = TransformGesture::new(GestureKind::Scale(handle));
        gesture.pointer_down(
            &annotation,
            &image,
            &PointerEvent::new(dragged.x, dragged.y, 0.0),
        );
        gesture.pointer_move(
            &annotation,
            &ctx,
            &mut renderer,
            &PointerEvent::new(target.x, target.y, 250.0),
        );
        assert!(gesture.pointer_up(
            &mut annotation,
            &ctx,
            &mut renderer,
            None,
            &PointerEvent::new(target.x, target.y, 260.0),
        ));

        let after = annotation.aabb();
        assert_close(after.corner(handle.opposite()), pivot);
        assert!((after.width() - base.width() * 2.0).abs() < 1e-9, "{handle:?}");
        assert!((after.height() - base.height() * 1.5).abs() < 1e-9, "{handle:?}");
    }
}

#[test]
fn move_to_centers_the_bounding_box() {
    let mut annotation = square_annotation();
    annotation.move_to(Point::new(120.0, 80.0), None);
    assert_close(annotation.aabb().center(), Point::new(120.0, 80.0));
}

#[test]
fn set_text_undo_carries_the_previous_content() {
    let bus = EventBus::new();
    let undos: Arc<Mutex<Vec<EditCommand>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = undos.clone();
    bus.subscribe(move |event| {
        if let AnnotationEvent::EditRequested { undo, .. } = event {
            sink.lock().push(undo.clone());
        }
    });

    let mut annotation = square_annotation();
    annotation.set_text_content(Some("first".into()), true, Some(&bus));
    annotation.set_text_content(Some("second".into()), true, Some(&bus));

    let undos = undos.lock();
    assert_eq!(undos.len(), 2);
    assert_eq!(
        undos[1],
        EditCommand::SetText {
            uuid: annotation.uuid(),
            previous: Some("first".into()),
        }
    );
}

//! Wire-format round trips for every annotation type.

use proptest::prelude::*;

use rastermark_annotations::geom::{BBox, LineEnding, Point};
use rastermark_annotations::model::{
    Annotation, Callout, CircleShape, IconPath, IconRecipe, LeaderExtent, LineShape, NoteShape,
    PathCmd, PenShape, PolygonShape, PolylineShape, Shape, SquareShape, StampContent, StampShape,
    StrokeStyle, TextShape,
};
use rastermark_annotations::render::Color;
use rastermark_annotations::AnnotationDto;

fn style() -> StrokeStyle {
    StrokeStyle {
        color: Color::new(0.8, 0.1, 0.1, 1.0),
        width: 3.0,
        dash: vec![4.0, 2.0],
        fill: Some(Color::new(0.8, 0.1, 0.1, 0.25)),
    }
}

fn every_shape() -> Vec<Shape> {
    let mut circle = CircleShape::new(Point::new(50.0, 40.0), 20.0, 15.0, style());
    circle.rotation = 0.3;
    circle.cloud = Some(6.0);

    let mut square = SquareShape::new(Point::new(60.0, 35.0), 100.0, 50.0, style());
    square.rotation = -0.1;

    let mut line = LineShape::new(Point::new(0.0, 0.0), Point::new(80.0, 20.0), style());
    line.ending_start = LineEnding::Butt;
    line.ending_end = LineEnding::OpenArrow;
    line.leader = Some(LeaderExtent {
        positive: 8.0,
        negative: 4.0,
    });

    let mut text = TextShape::new(
        BBox::axis_aligned(10.0, 10.0, 110.0, 60.0),
        14.0,
        style(),
        Color::BLACK,
    );
    text.callout = Some(Callout {
        base: Point::new(10.0, 35.0),
        knee: Point::new(-20.0, 35.0),
        pointer: Point::new(-40.0, 60.0),
        ending: LineEnding::ClosedArrow,
    });

    let stamp = StampShape::new(
        Point::new(30.0, 30.0),
        24.0,
        24.0,
        StampContent::Icon(IconRecipe {
            paths: vec![IconPath {
                commands: vec![
                    PathCmd::MoveTo(Point::new(0.0, 0.0)),
                    PathCmd::LineTo(Point::new(10.0, 10.0)),
                    PathCmd::CurveTo(
                        Point::new(12.0, 12.0),
                        Point::new(14.0, 10.0),
                        Point::new(16.0, 8.0),
                    ),
                    PathCmd::Close,
                ],
                fill: Some(Color::BLACK),
                stroke: None,
                stroke_width: 1.0,
            }],
            design_width: 16.0,
            design_height: 16.0,
        }),
    );

    let bitmap_stamp = StampShape::new(
        Point::new(70.0, 70.0),
        16.0,
        16.0,
        StampContent::Bitmap {
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        },
    );

    vec![
        Shape::Circle(circle),
        Shape::Square(square),
        Shape::Line(line),
        Shape::Polyline(PolylineShape::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0), Point::new(20.0, 0.0)],
            style(),
        )),
        Shape::Polygon(PolygonShape::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)],
            style(),
        )),
        Shape::Text(text),
        Shape::Pen(PenShape::new(
            vec![vec![[0.0, 0.0], [5.0, 5.0], [10.0, 3.0]]],
            style(),
        )),
        Shape::Stamp(stamp),
        Shape::Stamp(bitmap_stamp),
        Shape::Note(NoteShape::new(
            Point::new(15.0, 15.0),
            16.0,
            16.0,
            Color::new(1.0, 0.9, 0.2, 1.0),
        )),
    ]
}

#[test]
fn every_kind_round_trips_through_json() {
    for shape in every_shape() {
        let mut annotation = Annotation::new(shape, "round-trip");
        annotation.set_text_content(Some("note to self".into()), false, None);

        let dto = annotation.to_dto();
        let json = serde_json::to_string(&dto).expect("serialize");
        let parsed: AnnotationDto = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, dto, "kind {:?}", dto.kind());

        let rebuilt = Annotation::from_dto(parsed);
        assert_eq!(rebuilt.to_dto(), dto, "kind {:?}", dto.kind());
        assert_eq!(rebuilt.uuid(), annotation.uuid());
        assert_eq!(rebuilt.text_content(), annotation.text_content());
    }
}

#[test]
fn attached_annotation_keeps_its_image_through_the_wire() {
    let mut annotation = Annotation::new(every_shape().remove(0), "round-trip");
    let image = uuid::Uuid::new_v4();
    annotation.attach_to(image).unwrap();

    let json = serde_json::to_string(&annotation.to_dto()).unwrap();
    let parsed: AnnotationDto = serde_json::from_str(&json).unwrap();
    assert_eq!(Annotation::from_dto(parsed).image_uuid(), Some(image));
}

proptest! {
    #[test]
    fn square_geometry_survives_any_placement(
        cx in -1000.0..1000.0f64,
        cy in -1000.0..1000.0f64,
        w in 0.1..500.0f64,
        h in 0.1..500.0f64,
        rot in -3.14..3.14f64,
    ) {
        let mut shape = SquareShape::new(Point::new(cx, cy), w, h, StrokeStyle::default());
        shape.rotation = rot;
        let annotation = Annotation::new(Shape::Square(shape), "prop");

        let json = serde_json::to_string(&annotation.to_dto()).unwrap();
        let parsed: AnnotationDto = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, annotation.to_dto());
    }
}

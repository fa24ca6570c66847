//! Wire format for annotations.
//!
//! One JSON object per annotation, discriminated by an `annotationType` tag,
//! with the common identity fields flattened alongside the shape payload.
//! Points serialize as `[x, y]` pairs and colors as `[r, g, b, a]` with
//! components in `0..=1`. Conversion to and from the model is pure: a round
//! trip reproduces the annotation except for the bounding-box cache, which
//! is derived state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    Annotation, AnnotationKind, CircleShape, LineShape, NoteShape, PenShape, PolygonShape,
    PolylineShape, Shape, SquareShape, StampShape, TextShape,
};

/// Identity and bookkeeping fields shared by every annotation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonDto {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uuid: Option<Uuid>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub author: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

/// Serialized annotation, tagged by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "annotationType", rename_all = "lowercase")]
pub enum AnnotationDto {
    Circle {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: CircleShape,
    },
    Square {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: SquareShape,
    },
    Line {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: LineShape,
    },
    Polyline {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: PolylineShape,
    },
    Polygon {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: PolygonShape,
    },
    Text {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: TextShape,
    },
    Pen {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: PenShape,
    },
    Stamp {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: StampShape,
    },
    Note {
        #[serde(flatten)]
        common: CommonDto,
        #[serde(flatten)]
        shape: NoteShape,
    },
}

impl AnnotationDto {
    pub fn common(&self) -> &CommonDto {
        match self {
            AnnotationDto::Circle { common, .. }
            | AnnotationDto::Square { common, .. }
            | AnnotationDto::Line { common, .. }
            | AnnotationDto::Polyline { common, .. }
            | AnnotationDto::Polygon { common, .. }
            | AnnotationDto::Text { common, .. }
            | AnnotationDto::Pen { common, .. }
            | AnnotationDto::Stamp { common, .. }
            | AnnotationDto::Note { common, .. } => common,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.common().uuid
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationDto::Circle { .. } => AnnotationKind::Circle,
            AnnotationDto::Square { .. } => AnnotationKind::Square,
            AnnotationDto::Line { .. } => AnnotationKind::Line,
            AnnotationDto::Polyline { .. } => AnnotationKind::Polyline,
            AnnotationDto::Polygon { .. } => AnnotationKind::Polygon,
            AnnotationDto::Text { .. } => AnnotationKind::Text,
            AnnotationDto::Pen { .. } => AnnotationKind::Pen,
            AnnotationDto::Stamp { .. } => AnnotationKind::Stamp,
            AnnotationDto::Note { .. } => AnnotationKind::Note,
        }
    }

    fn into_parts(self) -> (CommonDto, Shape) {
        match self {
            AnnotationDto::Circle { common, shape } => (common, Shape::Circle(shape)),
            AnnotationDto::Square { common, shape } => (common, Shape::Square(shape)),
            AnnotationDto::Line { common, shape } => (common, Shape::Line(shape)),
            AnnotationDto::Polyline { common, shape } => (common, Shape::Polyline(shape)),
            AnnotationDto::Polygon { common, shape } => (common, Shape::Polygon(shape)),
            AnnotationDto::Text { common, shape } => (common, Shape::Text(shape)),
            AnnotationDto::Pen { common, shape } => (common, Shape::Pen(shape)),
            AnnotationDto::Stamp { common, shape } => (common, Shape::Stamp(shape)),
            AnnotationDto::Note { common, shape } => (common, Shape::Note(shape)),
        }
    }
}

impl Annotation {
    /// Converts to the wire representation.
    pub fn to_dto(&self) -> AnnotationDto {
        let common = CommonDto {
            uuid: self.uuid(),
            image_uuid: self.image_uuid(),
            date_created: self.date_created(),
            date_modified: self.date_modified(),
            author: self.author().to_string(),
            deleted: self.deleted(),
            text_content: self.text_content().map(str::to_string),
        };
        match self.shape().clone() {
            Shape::Circle(shape) => AnnotationDto::Circle { common, shape },
            Shape::Square(shape) => AnnotationDto::Square { common, shape },
            Shape::Line(shape) => AnnotationDto::Line { common, shape },
            Shape::Polyline(shape) => AnnotationDto::Polyline { common, shape },
            Shape::Polygon(shape) => AnnotationDto::Polygon { common, shape },
            Shape::Text(shape) => AnnotationDto::Text { common, shape },
            Shape::Pen(shape) => AnnotationDto::Pen { common, shape },
            Shape::Stamp(shape) => AnnotationDto::Stamp { common, shape },
            Shape::Note(shape) => AnnotationDto::Note { common, shape },
        }
    }

    /// Rebuilds an annotation from its wire representation.
    pub fn from_dto(dto: AnnotationDto) -> Annotation {
        let (common, shape) = dto.into_parts();
        Annotation::from_parts(
            common.uuid,
            common.image_uuid,
            common.date_created,
            common.date_modified,
            common.author,
            common.deleted,
            common.text_content,
            shape,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::model::StrokeStyle;

    #[test]
    fn json_carries_the_type_tag_and_pairs() {
        let annotation = Annotation::new(
            Shape::Square(SquareShape::new(
                Point::new(60.0, 35.0),
                100.0,
                50.0,
                StrokeStyle::default(),
            )),
            "tester",
        );
        let json = serde_json::to_value(annotation.to_dto()).unwrap();
        assert_eq!(json["annotationType"], "square");
        assert_eq!(json["center"][0], 60.0);
        assert_eq!(json["center"][1], 35.0);
        assert_eq!(json["style"]["color"][3], 1.0);
    }

    #[test]
    fn unknown_type_tag_fails_to_parse() {
        let json = r#"{"annotationType":"sparkle","uuid":"00000000-0000-0000-0000-000000000000"}"#;
        assert!(serde_json::from_str::<AnnotationDto>(json).is_err());
    }
}

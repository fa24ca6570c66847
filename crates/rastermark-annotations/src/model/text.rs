//! Text annotation: a rigid rectangle carrying laid-out text, optionally
//! with a callout arm pointing at a feature of the image.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, LayoutPivot, LineEnding, Point, Transform};
use crate::render::{Appearance, Color, RenderContext, RenderError, RenderText};

use super::StrokeStyle;

/// Callout arm from the text box to a point of interest.
///
/// `base` sits on the box edge, `knee` is the elbow, `pointer` is the tip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub base: Point,
    pub knee: Point,
    pub pointer: Point,
    #[serde(default)]
    pub ending: LineEnding,
}

/// Text box stored as its four corners, so rotation is implicit in the
/// geometry rather than tracked separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub bbox: BBox,
    pub font_size: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    pub style: StrokeStyle,
    pub text_color: Color,
    #[serde(default)]
    pub callout: Option<Callout>,
}

fn default_padding() -> f64 {
    4.0
}

impl TextShape {
    pub fn new(bbox: BBox, font_size: f64, style: StrokeStyle, text_color: Color) -> Self {
        Self {
            bbox,
            font_size,
            padding: default_padding(),
            style,
            text_color,
            callout: None,
        }
    }

    /// Edge midpoints in lower, right, upper, left order, derived from the
    /// corners (callout arms anchor to these).
    pub fn edge_midpoints(&self) -> [Point; 4] {
        [
            self.bbox.ll.midpoint(&self.bbox.lr),
            self.bbox.lr.midpoint(&self.bbox.ur),
            self.bbox.ur.midpoint(&self.bbox.ul),
            self.bbox.ul.midpoint(&self.bbox.ll),
        ]
    }

    /// Rotation derived from the lower edge, radians.
    pub fn rotation(&self) -> f64 {
        let (dx, dy) = self.bbox.ll.vector_to(&self.bbox.lr);
        dy.atan2(dx)
    }

    pub fn transform(&mut self, t: &Transform) {
        self.bbox = self.bbox.transformed(t);
        if let Some(callout) = &mut self.callout {
            callout.base = callout.base.transformed(t);
            callout.knee = callout.knee.transformed(t);
            callout.pointer = callout.pointer.transformed(t);
        }
    }

    pub fn compute_aabb(&self) -> BBox {
        let mut points: Vec<Point> = self.bbox.corners().to_vec();
        let mut extra = 0.0f64;
        if let Some(callout) = &self.callout {
            points.push(callout.base);
            points.push(callout.knee);
            points.push(callout.pointer);
            if callout.ending.has_extent() {
                extra = geom::ending_size(self.style.width);
            }
        }
        BBox::around_points(&points, self.style.width / 2.0 + extra)
    }

    pub fn appearance(
        &self,
        ctx: &RenderContext<'_>,
        text: Option<&str>,
    ) -> Result<Appearance, RenderError> {
        let mut appearance = Appearance::new();
        let corners = self.bbox.corners();
        let border = format!(
            "M {} {} L {} {} L {} {} L {} {} Z",
            corners[0].x,
            corners[0].y,
            corners[1].x,
            corners[1].y,
            corners[2].x,
            corners[2].y,
            corners[3].x,
            corners[3].y
        );
        match self.style.fill {
            Some(fill) => {
                appearance.fill(border, fill, Some((self.style.color, self.style.width)));
            }
            None => {
                appearance.stroke(border, self.style.color, self.style.width, &self.style.dash);
            }
        }

        if let Some(callout) = &self.callout {
            appearance.stroke(
                format!(
                    "M {} {} L {} {} L {} {}",
                    callout.base.x,
                    callout.base.y,
                    callout.knee.x,
                    callout.knee.y,
                    callout.pointer.x,
                    callout.pointer.y
                ),
                self.style.color,
                self.style.width,
                &[],
            );
            let (dx, dy) = callout.knee.vector_to(&callout.pointer);
            let angle = dy.atan2(dx);
            if let Some(glyph) = geom::ending_path(
                callout.pointer,
                angle,
                callout.ending,
                self.style.width,
                false,
            ) {
                appearance.fill(glyph, self.style.color, None);
            }
        }

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.push_text(&mut appearance, ctx, text);
        }
        Ok(appearance)
    }

    /// Lays text out in the box's own frame: measure against the de-rotated
    /// width, then rotate each line about the box's upper-left corner.
    fn push_text(&self, appearance: &mut Appearance, ctx: &RenderContext<'_>, text: &str) {
        let rotation = self.rotation();
        let inner_width = (self.bbox.width() - 2.0 * self.padding).max(self.font_size);
        let lines = ctx
            .text_measure
            .layout(text, inner_width, self.font_size, LayoutPivot::TopLeft);
        let anchor = self.bbox.ul;
        for line in lines {
            appearance.texts.push(RenderText {
                origin: Point::new(
                    anchor.x + self.padding + line.origin.x,
                    anchor.y + self.padding + line.origin.y + self.font_size,
                ),
                text: line.text,
                font_size: self.font_size,
                color: self.text_color,
                rotation,
                rotation_center: anchor,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> TextShape {
        TextShape::new(
            BBox::axis_aligned(10.0, 10.0, 110.0, 60.0),
            12.0,
            StrokeStyle::default(),
            Color::BLACK,
        )
    }

    #[test]
    fn rotation_is_derived_from_lower_edge() {
        let mut s = shape();
        assert!(s.rotation().abs() < 1e-12);
        s.transform(&geom::rotate_about(0.3, Point::new(60.0, 35.0)));
        assert!((s.rotation() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn callout_points_move_with_the_box() {
        let mut s = shape();
        s.callout = Some(Callout {
            base: Point::new(10.0, 35.0),
            knee: Point::new(-20.0, 35.0),
            pointer: Point::new(-30.0, 50.0),
            ending: LineEnding::ClosedArrow,
        });
        s.transform(&Transform::translation(5.0, 0.0));
        let callout = s.callout.unwrap();
        assert!((callout.pointer.x + 25.0).abs() < 1e-9);
        // Callout tip extends the bounding box.
        let bbox = s.compute_aabb();
        assert!(bbox.ul.x < -25.0);
    }
}

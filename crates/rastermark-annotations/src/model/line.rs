//! Line / measurement annotation with ending glyphs, leader lines, and an
//! optional caption rendered along the line.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, LayoutPivot, LineEnding, Point, Transform};
use crate::render::{Appearance, RenderContext, RenderError, RenderText};

use super::StrokeStyle;

/// Perpendicular leader-line extents at a line endpoint, in image units on
/// either side of the line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderExtent {
    pub positive: f64,
    pub negative: f64,
}

/// Two-point line with optional ending glyphs and measurement leaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    pub start: Point,
    pub end: Point,
    pub style: StrokeStyle,
    #[serde(default)]
    pub ending_start: LineEnding,
    #[serde(default)]
    pub ending_end: LineEnding,
    /// When set, perpendicular leader lines are drawn at both endpoints.
    #[serde(default)]
    pub leader: Option<LeaderExtent>,
    /// Caption font size.
    #[serde(default = "default_caption_size")]
    pub caption_size: f64,
}

fn default_caption_size() -> f64 {
    12.0
}

impl LineShape {
    pub fn new(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self {
            start,
            end,
            style,
            ending_start: LineEnding::None,
            ending_end: LineEnding::None,
            leader: None,
            caption_size: default_caption_size(),
        }
    }

    /// Direction of the line from start to end, radians.
    pub fn angle(&self) -> f64 {
        let (dx, dy) = self.start.vector_to(&self.end);
        dy.atan2(dx)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn transform(&mut self, t: &Transform) {
        self.start = self.start.transformed(t);
        self.end = self.end.transformed(t);
        if let Some(leader) = &mut self.leader {
            let (sx, sy) = geom::scale_of(t);
            let factor = (sx + sy) / 2.0;
            leader.positive *= factor;
            leader.negative *= factor;
        }
    }

    fn margin_extra(&self) -> f64 {
        let mut extra = self.style.width;
        if self.ending_start.has_extent() || self.ending_end.has_extent() {
            extra = extra.max(geom::ending_size(self.style.width));
        }
        if let Some(leader) = &self.leader {
            extra = extra.max(leader.positive).max(leader.negative);
        }
        extra
    }

    pub fn compute_aabb(&self) -> BBox {
        let margin = self.style.width / 2.0 + self.margin_extra();
        BBox::around_points([&self.start, &self.end], margin)
    }

    pub fn appearance(
        &self,
        ctx: &RenderContext<'_>,
        text: Option<&str>,
    ) -> Result<Appearance, RenderError> {
        let mut appearance = Appearance::new();
        appearance.stroke(
            format!(
                "M {} {} L {} {}",
                self.start.x, self.start.y, self.end.x, self.end.y
            ),
            self.style.color,
            self.style.width,
            &self.style.dash,
        );

        let angle = self.angle();
        if let Some(glyph) =
            geom::ending_path(self.end, angle, self.ending_end, self.style.width, false)
        {
            self.push_glyph(&mut appearance, glyph, self.ending_end);
        }
        if let Some(glyph) =
            geom::ending_path(self.start, angle, self.ending_start, self.style.width, true)
        {
            self.push_glyph(&mut appearance, glyph, self.ending_start);
        }

        if let Some(leader) = &self.leader {
            let (sin, cos) = angle.sin_cos();
            // Perpendicular to travel direction, to the left.
            let (nx, ny) = (sin, -cos);
            for at in [self.start, self.end] {
                appearance.stroke(
                    format!(
                        "M {} {} L {} {}",
                        at.x + nx * leader.positive,
                        at.y + ny * leader.positive,
                        at.x - nx * leader.negative,
                        at.y - ny * leader.negative
                    ),
                    self.style.color,
                    self.style.width,
                    &[],
                );
            }
        }

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.push_caption(&mut appearance, ctx, text);
        }

        Ok(appearance)
    }

    fn push_glyph(&self, appearance: &mut Appearance, glyph: String, ending: LineEnding) {
        match ending {
            LineEnding::ClosedArrow | LineEnding::Diamond | LineEnding::Square => {
                appearance.fill(glyph, self.style.color, None);
            }
            _ => {
                appearance.stroke(glyph, self.style.color, self.style.width, &[]);
            }
        }
    }

    /// Lays the caption along the line, above its midpoint, flipped where
    /// needed so it always reads left to right.
    fn push_caption(&self, appearance: &mut Appearance, ctx: &RenderContext<'_>, text: &str) {
        let mid = self.start.midpoint(&self.end);
        let mut angle = self.angle();
        if angle > std::f64::consts::FRAC_PI_2 {
            angle -= std::f64::consts::PI;
        } else if angle < -std::f64::consts::FRAC_PI_2 {
            angle += std::f64::consts::PI;
        }

        let max_width = self.length().max(self.caption_size);
        let lines = ctx
            .text_measure
            .layout(text, max_width, self.caption_size, LayoutPivot::BottomMargin);
        let clearance = self.style.width / 2.0 + 2.0;
        for line in lines {
            appearance.texts.push(RenderText {
                origin: Point::new(
                    mid.x + line.origin.x - line.width / 2.0,
                    mid.y + line.origin.y + self.caption_size - clearance,
                ),
                text: line.text,
                font_size: self.caption_size,
                color: self.style.color,
                rotation: angle,
                rotation_center: mid,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_margin_combines_glyph_size_and_half_stroke() {
        let mut style = StrokeStyle::default();
        style.width = 4.0;
        let mut shape = LineShape::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), style);
        shape.ending_end = LineEnding::OpenArrow;
        let bbox = shape.compute_aabb();
        // Glyph size max(10, 3*4) = 12, plus half the stroke width.
        assert!((bbox.lr.x - 114.0).abs() < 1e-9);
        assert!((bbox.ul.y + 14.0).abs() < 1e-9);
    }

    #[test]
    fn plain_line_margin_uses_stroke_width() {
        let mut style = StrokeStyle::default();
        style.width = 4.0;
        let shape = LineShape::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), style);
        let bbox = shape.compute_aabb();
        assert!((bbox.ul.x + 6.0).abs() < 1e-9);
    }

    #[test]
    fn transform_scales_leader_extents() {
        let mut style = StrokeStyle::default();
        style.width = 2.0;
        let mut shape = LineShape::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), style);
        shape.leader = Some(LeaderExtent {
            positive: 4.0,
            negative: 2.0,
        });
        shape.transform(&Transform::scale(2.0, 2.0));
        let leader = shape.leader.unwrap();
        assert!((leader.positive - 8.0).abs() < 1e-9);
        assert!((leader.negative - 4.0).abs() < 1e-9);
    }
}

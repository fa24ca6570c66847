//! Sticky-note annotation: a colored note glyph with a folded corner. The
//! note's text lives in the annotation's text content and is shown by the
//! host in a popup, not drawn on the image.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point, Transform};
use crate::render::{Appearance, Color, RenderContext, RenderError};

use super::transform_box;

/// Fold size as a fraction of the note's shorter extent.
const FOLD_RATIO: f64 = 0.25;
const OUTLINE_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteShape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Accumulated rotation about the center, radians.
    #[serde(default)]
    pub rotation: f64,
    pub color: Color,
}

impl NoteShape {
    pub fn new(center: Point, width: f64, height: f64, color: Color) -> Self {
        Self {
            center,
            width,
            height,
            rotation: 0.0,
            color,
        }
    }

    pub fn transform(&mut self, t: &Transform) {
        transform_box(
            t,
            &mut self.center,
            &mut self.width,
            &mut self.height,
            &mut self.rotation,
        );
    }

    pub fn compute_aabb(&self) -> BBox {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let rot = geom::rotate_about(self.rotation, self.center);
        let corners = [
            Point::new(self.center.x - hw, self.center.y + hh).transformed(&rot),
            Point::new(self.center.x + hw, self.center.y + hh).transformed(&rot),
            Point::new(self.center.x + hw, self.center.y - hh).transformed(&rot),
            Point::new(self.center.x - hw, self.center.y - hh).transformed(&rot),
        ];
        BBox::around_points(&corners, OUTLINE_WIDTH / 2.0)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let x0 = self.center.x - self.width / 2.0;
        let y0 = self.center.y - self.height / 2.0;
        let x1 = self.center.x + self.width / 2.0;
        let y1 = self.center.y + self.height / 2.0;
        let fold = self.width.min(self.height) * FOLD_RATIO;

        let rot = geom::rotate_about(self.rotation, self.center);
        let p = |x: f64, y: f64| Point::new(x, y).transformed(&rot);

        // Body with the lower-right corner cut away for the fold.
        let body = [
            p(x0, y0),
            p(x1, y0),
            p(x1, y1 - fold),
            p(x1 - fold, y1),
            p(x0, y1),
        ];
        let mut body_path = String::new();
        for (i, pt) in body.iter().enumerate() {
            let op = if i == 0 { 'M' } else { 'L' };
            body_path.push_str(&format!("{op} {} {} ", pt.x, pt.y));
        }
        body_path.push('Z');

        let fold_pts = [p(x1 - fold, y1), p(x1 - fold, y1 - fold), p(x1, y1 - fold)];
        let fold_path = format!(
            "M {} {} L {} {} L {} {} Z",
            fold_pts[0].x,
            fold_pts[0].y,
            fold_pts[1].x,
            fold_pts[1].y,
            fold_pts[2].x,
            fold_pts[2].y
        );

        let shade = Color::new(
            self.color.r * 0.8,
            self.color.g * 0.8,
            self.color.b * 0.8,
            self.color.a,
        );
        let mut appearance = Appearance::new();
        appearance.fill(body_path, self.color, Some((Color::BLACK, OUTLINE_WIDTH)));
        appearance.fill(fold_path, shade, None);
        Ok(appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appearance_has_body_and_fold() {
        let shape = NoteShape::new(
            Point::new(20.0, 20.0),
            16.0,
            16.0,
            Color::new(1.0, 0.9, 0.2, 1.0),
        );
        let image = rastermark_core::ImageContext::new(uuid::Uuid::new_v4(), 100.0, 100.0);
        let measure = crate::geom::MonospaceMeasure::default();
        let ctx = RenderContext {
            image: &image,
            text_measure: &measure,
        };
        let appearance = shape.appearance(&ctx).unwrap();
        assert_eq!(appearance.paths.len(), 2);
        assert!(appearance.paths[1].fill.is_some());
    }

    #[test]
    fn rotation_accumulates_through_transforms() {
        let mut shape = NoteShape::new(Point::new(0.0, 0.0), 10.0, 10.0, Color::BLACK);
        shape.transform(&geom::rotate_about(0.2, Point::new(0.0, 0.0)));
        shape.transform(&geom::rotate_about(0.3, Point::new(0.0, 0.0)));
        assert!((shape.rotation - 0.5).abs() < 1e-9);
    }
}

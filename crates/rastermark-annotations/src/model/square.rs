//! Rectangle annotation, optionally with a cloud stroke.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point};
use crate::render::{Appearance, RenderContext, RenderError};

use super::{transform_box, StrokeStyle};
use crate::geom::Transform;

/// Axis-box rectangle described by center, extents, and accumulated rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareShape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Accumulated rotation about the center, radians.
    #[serde(default)]
    pub rotation: f64,
    pub style: StrokeStyle,
    /// When set, edges are drawn as cloud scallops with this arc size.
    #[serde(default)]
    pub cloud: Option<f64>,
}

impl SquareShape {
    pub fn new(center: Point, width: f64, height: f64, style: StrokeStyle) -> Self {
        Self {
            center,
            width,
            height,
            rotation: 0.0,
            style,
            cloud: None,
        }
    }

    /// The four corners in lower-left, lower-right, upper-right, upper-left
    /// order, rotation applied.
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let rot = geom::rotate_about(self.rotation, self.center);
        [
            Point::new(self.center.x - hw, self.center.y + hh).transformed(&rot),
            Point::new(self.center.x + hw, self.center.y + hh).transformed(&rot),
            Point::new(self.center.x + hw, self.center.y - hh).transformed(&rot),
            Point::new(self.center.x - hw, self.center.y - hh).transformed(&rot),
        ]
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
        let margin = self.style.width / 2.0 + self.cloud.map_or(0.0, |arc| arc / 2.0);
        BBox::around_points(&self.corners(), margin)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let corners = self.corners();
        let mut appearance = Appearance::new();
        let data = match self.cloud {
            Some(arc) => {
                let loop_points = [corners[0], corners[1], corners[2], corners[3], corners[0]];
                geom::cloud_path(&geom::cloud_from_polyline(&loop_points, arc))
            }
            None => format!(
                "M {} {} L {} {} L {} {} L {} {} Z",
                corners[0].x,
                corners[0].y,
                corners[1].x,
                corners[1].y,
                corners[2].x,
                corners[2].y,
                corners[3].x,
                corners[3].y
            ),
        };
        match self.style.fill {
            Some(fill) => {
                appearance.fill(data, fill, Some((self.style.color, self.style.width)));
            }
            None => {
                appearance.stroke(data, self.style.color, self.style.width, &self.style.dash);
            }
        }
        Ok(appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_follow_rotation() {
        let mut shape = SquareShape::new(Point::new(0.0, 0.0), 10.0, 4.0, StrokeStyle::default());
        shape.rotation = std::f64::consts::FRAC_PI_2;
        let corners = shape.corners();
        // A quarter turn maps the lower-left corner (-5, 2) to (-2, -5).
        assert!((corners[0].x + 2.0).abs() < 1e-9);
        assert!((corners[0].y + 5.0).abs() < 1e-9);
    }

    #[test]
    fn scale_transform_grows_extents() {
        let mut shape = SquareShape::new(Point::new(5.0, 5.0), 10.0, 10.0, StrokeStyle::default());
        shape.transform(&Transform::scale(2.0, 0.5));
        assert!((shape.width - 20.0).abs() < 1e-9);
        assert!((shape.height - 5.0).abs() < 1e-9);
        assert!((shape.center.x - 10.0).abs() < 1e-9);
        assert!((shape.center.y - 2.5).abs() < 1e-9);
    }
}

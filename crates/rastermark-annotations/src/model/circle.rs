//! Ellipse annotation, drawn as four cubic beziers or as a cloud boundary.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point, Transform, BEZIER_CIRCLE_K};
use crate::render::{Appearance, RenderContext, RenderError};

use super::{transform_box, StrokeStyle};

/// Ellipse described by center, radii, and accumulated rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// Accumulated rotation about the center, radians.
    #[serde(default)]
    pub rotation: f64,
    pub style: StrokeStyle,
    /// When set, the boundary is drawn as cloud scallops with this arc size.
    #[serde(default)]
    pub cloud: Option<f64>,
}

impl CircleShape {
    pub fn new(center: Point, rx: f64, ry: f64, style: StrokeStyle) -> Self {
        Self {
            center,
            rx,
            ry,
            rotation: 0.0,
            style,
            cloud: None,
        }
    }

    pub fn transform(&mut self, t: &Transform) {
        let mut width = self.rx * 2.0;
        let mut height = self.ry * 2.0;
        transform_box(
            t,
            &mut self.center,
            &mut width,
            &mut height,
            &mut self.rotation,
        );
        self.rx = width / 2.0;
        self.ry = height / 2.0;
    }

    pub fn compute_aabb(&self) -> BBox {
        let margin = self.style.width / 2.0 + self.cloud.map_or(0.0, |arc| arc / 2.0);
        let rot = geom::rotate_about(self.rotation, self.center);
        let corners = [
            Point::new(self.center.x - self.rx, self.center.y + self.ry).transformed(&rot),
            Point::new(self.center.x + self.rx, self.center.y + self.ry).transformed(&rot),
            Point::new(self.center.x + self.rx, self.center.y - self.ry).transformed(&rot),
            Point::new(self.center.x - self.rx, self.center.y - self.ry).transformed(&rot),
        ];
        BBox::around_points(&corners, margin)
    }

    /// Four-cubic approximation of the ellipse boundary, rotation applied.
    fn bezier_path(&self) -> String {
        let (cx, cy) = (self.center.x, self.center.y);
        let (rx, ry) = (self.rx, self.ry);
        let kx = rx * BEZIER_CIRCLE_K;
        let ky = ry * BEZIER_CIRCLE_K;
        let rot = geom::rotate_about(self.rotation, self.center);
        let p = |x: f64, y: f64| Point::new(x, y).transformed(&rot);

        let east = p(cx + rx, cy);
        let south = p(cx, cy + ry);
        let west = p(cx - rx, cy);
        let north = p(cx, cy - ry);

        let segs = [
            (p(cx + rx, cy + ky), p(cx + kx, cy + ry), south),
            (p(cx - kx, cy + ry), p(cx - rx, cy + ky), west),
            (p(cx - rx, cy - ky), p(cx - kx, cy - ry), north),
            (p(cx + kx, cy - ry), p(cx + rx, cy - ky), east),
        ];

        let mut path = format!("M {} {} ", east.x, east.y);
        for (c1, c2, to) in segs {
            path.push_str(&format!(
                "C {} {} {} {} {} {} ",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            ));
        }
        path.push('Z');
        path
    }

    fn cloud_boundary(&self, arc: f64) -> String {
        let arcs = geom::cloud_from_ellipse(self.center, self.rx, self.ry, arc);
        if self.rotation.abs() < 1e-12 {
            return geom::cloud_path(&arcs);
        }
        let rot = geom::rotate_about(self.rotation, self.center);
        let rotated: Vec<_> = arcs
            .iter()
            .map(|a| geom::CloudArc {
                from: a.from.transformed(&rot),
                ctrl1: a.ctrl1.transformed(&rot),
                ctrl2: a.ctrl2.transformed(&rot),
                to: a.to.transformed(&rot),
            })
            .collect();
        geom::cloud_path(&rotated)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let data = match self.cloud {
            Some(arc) => self.cloud_boundary(arc),
            None => self.bezier_path(),
        };
        let mut appearance = Appearance::new();
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
    fn bezier_path_passes_through_cardinal_points() {
        let shape = CircleShape::new(Point::new(50.0, 50.0), 20.0, 10.0, StrokeStyle::default());
        let path = shape.bezier_path();
        assert!(path.starts_with("M 70 50"));
        assert!(path.contains("50 60")); // south
        assert!(path.contains("30 50")); // west
        assert!(path.contains("50 40")); // north
    }

    #[test]
    fn non_uniform_scale_updates_radii() {
        let mut shape = CircleShape::new(Point::new(0.0, 0.0), 10.0, 10.0, StrokeStyle::default());
        shape.transform(&Transform::scale(3.0, 0.5));
        assert!((shape.rx - 30.0).abs() < 1e-9);
        assert!((shape.ry - 5.0).abs() < 1e-9);
    }
}

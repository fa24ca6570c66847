//! Open polyline annotation.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point, Transform};
use crate::render::{Appearance, RenderContext, RenderError};

use super::StrokeStyle;

/// Open vertex chain, optionally drawn as cloud scallops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineShape {
    pub vertices: Vec<Point>,
    pub style: StrokeStyle,
    /// When set, segments are drawn as cloud scallops with this arc size.
    #[serde(default)]
    pub cloud: Option<f64>,
}

impl PolylineShape {
    pub fn new(vertices: Vec<Point>, style: StrokeStyle) -> Self {
        Self {
            vertices,
            style,
            cloud: None,
        }
    }

    pub fn transform(&mut self, t: &Transform) {
        for v in &mut self.vertices {
            *v = v.transformed(t);
        }
    }

    pub fn compute_aabb(&self) -> BBox {
        let margin = self.style.width / 2.0 + self.cloud.map_or(0.0, |arc| arc / 2.0);
        BBox::around_points(&self.vertices, margin)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let mut appearance = Appearance::new();
        if self.vertices.len() < 2 {
            return Ok(appearance);
        }
        let data = match self.cloud {
            Some(arc) => geom::cloud_path(&geom::cloud_from_polyline(&self.vertices, arc)),
            None => polyline_path(&self.vertices, false),
        };
        appearance.stroke(data, self.style.color, self.style.width, &self.style.dash);
        Ok(appearance)
    }
}

/// SVG path through a vertex chain, optionally closed.
pub(crate) fn polyline_path(vertices: &[Point], close: bool) -> String {
    let mut data = String::new();
    for (i, v) in vertices.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        data.push_str(&format!("{op} {} {} ", v.x, v.y));
    }
    if close {
        data.push('Z');
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_covers_all_vertices() {
        let shape = PolylineShape::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 20.0),
                Point::new(-5.0, 5.0),
            ],
            StrokeStyle::default(),
        );
        let bbox = shape.compute_aabb();
        assert!((bbox.ul.x + 6.0).abs() < 1e-9); // -5 minus half stroke
        assert!((bbox.ll.y - 21.0).abs() < 1e-9); // 20 plus half stroke
    }

    #[test]
    fn single_vertex_produces_empty_appearance() {
        let shape = PolylineShape::new(vec![Point::new(1.0, 1.0)], StrokeStyle::default());
        let ctx_free = shape.compute_aabb();
        assert!((ctx_free.width()).abs() < 2.1); // margin only
    }
}

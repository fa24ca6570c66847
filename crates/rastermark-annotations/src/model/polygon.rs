//! Closed polygon annotation.

use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point, Transform};
use crate::render::{Appearance, RenderContext, RenderError};

use super::polyline::polyline_path;
use super::StrokeStyle;

/// Closed vertex loop, optionally drawn as cloud scallops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub vertices: Vec<Point>,
    pub style: StrokeStyle,
    /// When set, edges are drawn as cloud scallops with this arc size.
    #[serde(default)]
    pub cloud: Option<f64>,
}

impl PolygonShape {
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
        if self.vertices.len() < 3 {
            return Ok(appearance);
        }
        let data = match self.cloud {
            Some(arc) => {
                let mut loop_points = self.vertices.clone();
                loop_points.push(self.vertices[0]);
                geom::cloud_path(&geom::cloud_from_polyline(&loop_points, arc))
            }
            None => polyline_path(&self.vertices, true),
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

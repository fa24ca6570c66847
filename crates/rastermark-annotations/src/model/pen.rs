//! Freehand pen annotation: one or more smoothed strokes.

use serde::{Deserialize, Serialize};

use crate::geom::{BBox, Point, Transform};
use crate::render::{Appearance, RenderContext, RenderError};

use super::StrokeStyle;

/// Freehand strokes stored as flat coordinate pairs, already smoothed at
/// capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenShape {
    pub strokes: Vec<Vec<[f64; 2]>>,
    pub style: StrokeStyle,
}

impl PenShape {
    pub fn new(strokes: Vec<Vec<[f64; 2]>>, style: StrokeStyle) -> Self {
        Self { strokes, style }
    }

    pub fn transform(&mut self, t: &Transform) {
        for stroke in &mut self.strokes {
            for p in stroke.iter_mut() {
                let moved = Point::new(p[0], p[1]).transformed(t);
                *p = [moved.x, moved.y];
            }
        }
    }

    pub fn compute_aabb(&self) -> BBox {
        let points: Vec<Point> = self
            .strokes
            .iter()
            .flatten()
            .map(|p| Point::new(p[0], p[1]))
            .collect();
        BBox::around_points(&points, self.style.width / 2.0)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        let mut appearance = Appearance::new();
        for stroke in &self.strokes {
            if stroke.len() < 2 {
                continue;
            }
            let mut data = String::new();
            for (i, p) in stroke.iter().enumerate() {
                let op = if i == 0 { 'M' } else { 'L' };
                data.push_str(&format!("{op} {} {} ", p[0], p[1]));
            }
            appearance.stroke(data, self.style.color, self.style.width, &self.style.dash);
        }
        Ok(appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_spans_all_strokes() {
        let shape = PenShape::new(
            vec![
                vec![[0.0, 0.0], [10.0, 10.0]],
                vec![[50.0, 50.0], [60.0, 40.0]],
            ],
            StrokeStyle::default(),
        );
        let bbox = shape.compute_aabb();
        assert!((bbox.ul.x + 1.0).abs() < 1e-9);
        assert!((bbox.lr.x - 61.0).abs() < 1e-9);
    }

    #[test]
    fn translate_moves_every_point() {
        let mut shape = PenShape::new(vec![vec![[1.0, 2.0], [3.0, 4.0]]], StrokeStyle::default());
        shape.transform(&Transform::translation(10.0, 20.0));
        assert_eq!(shape.strokes[0][0], [11.0, 22.0]);
        assert_eq!(shape.strokes[0][1], [13.0, 24.0]);
    }
}

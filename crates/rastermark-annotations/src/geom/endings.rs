//! Line-ending glyph construction.
//!
//! Each glyph is a small fixed-size path recipe placed at a line endpoint and
//! oriented along the line. Glyph size scales with stroke width but never
//! drops below a legibility floor.

use serde::{Deserialize, Serialize};

use super::Point;

/// Glyph size per unit of stroke width.
pub const LINE_END_MULTIPLIER: f64 = 3.0;
/// Minimum glyph size regardless of stroke width.
pub const LINE_END_MIN_SIZE: f64 = 10.0;

/// Line-ending glyph type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEnding {
    #[default]
    None,
    OpenArrow,
    ClosedArrow,
    Circle,
    Diamond,
    Square,
    Slash,
    Butt,
}

impl LineEnding {
    /// Whether the glyph occupies space beyond the line's endpoint, and thus
    /// contributes to the bounding-box margin.
    pub fn has_extent(self) -> bool {
        !matches!(self, LineEnding::None)
    }
}

/// Glyph size for a given stroke width.
pub fn ending_size(stroke_width: f64) -> f64 {
    (stroke_width * LINE_END_MULTIPLIER).max(LINE_END_MIN_SIZE)
}

/// Builds the SVG path for a line-ending glyph.
///
/// `at` is the line endpoint, `angle` the direction of the line leaving that
/// endpoint (radians, pointing away from the line body), `mirror` flips the
/// glyph for the far side of the line.
pub fn ending_path(
    at: Point,
    angle: f64,
    ending: LineEnding,
    stroke_width: f64,
    mirror: bool,
) -> Option<String> {
    let size = ending_size(stroke_width);
    let half = size / 2.0;
    let dir = if mirror { angle + std::f64::consts::PI } else { angle };
    let (sin, cos) = dir.sin_cos();

    // Places a recipe-local point (x along the line, y across it).
    let place = |x: f64, y: f64| -> Point {
        Point::new(at.x + x * cos - y * sin, at.y + x * sin + y * cos)
    };

    let path = match ending {
        LineEnding::None => return None,
        LineEnding::OpenArrow => {
            let a = place(-size, -half);
            let b = place(-size, half);
            format!(
                "M {} {} L {} {} L {} {}",
                a.x, a.y, at.x, at.y, b.x, b.y
            )
        }
        LineEnding::ClosedArrow => {
            let a = place(-size, -half);
            let b = place(-size, half);
            format!(
                "M {} {} L {} {} L {} {} Z",
                a.x, a.y, at.x, at.y, b.x, b.y
            )
        }
        LineEnding::Circle => {
            let west = place(-half, 0.0);
            let east = place(half, 0.0);
            format!(
                "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
                west.x, west.y, half, half, east.x, east.y, half, half, west.x, west.y
            )
        }
        LineEnding::Diamond => {
            let w = place(-half, 0.0);
            let n = place(0.0, -half);
            let e = place(half, 0.0);
            let s = place(0.0, half);
            format!(
                "M {} {} L {} {} L {} {} L {} {} Z",
                w.x, w.y, n.x, n.y, e.x, e.y, s.x, s.y
            )
        }
        LineEnding::Square => {
            let a = place(-half, -half);
            let b = place(half, -half);
            let c = place(half, half);
            let d = place(-half, half);
            format!(
                "M {} {} L {} {} L {} {} L {} {} Z",
                a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y
            )
        }
        LineEnding::Slash => {
            let a = place(-half, half);
            let b = place(half, -half);
            format!("M {} {} L {} {}", a.x, a.y, b.x, b.y)
        }
        LineEnding::Butt => {
            let a = place(0.0, -half);
            let b = place(0.0, half);
            format!("M {} {} L {} {}", a.x, a.y, b.x, b.y)
        }
    };
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_has_a_floor() {
        assert_eq!(ending_size(1.0), LINE_END_MIN_SIZE);
        assert_eq!(ending_size(4.0), 12.0);
    }

    #[test]
    fn none_produces_no_path() {
        assert!(ending_path(Point::new(0.0, 0.0), 0.0, LineEnding::None, 2.0, false).is_none());
    }

    #[test]
    fn open_arrow_ends_at_anchor() {
        let path =
            ending_path(Point::new(100.0, 50.0), 0.0, LineEnding::OpenArrow, 4.0, false).unwrap();
        assert!(path.contains("L 100 50"));
    }
}

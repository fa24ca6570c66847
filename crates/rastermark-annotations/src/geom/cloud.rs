//! Cloud-curve construction.
//!
//! The "cloud" stroke replaces straight edges with a scalloped row of arcs,
//! used for markup-style annotations. An arc is emitted as one cubic bezier
//! whose control points bulge outward perpendicular to the segment.

use super::Point;

/// Default arc size as a fraction of the image width.
pub const DEFAULT_ARC_RATIO: f64 = 0.02;

/// Angular step used when walking an ellipse's circumference.
const ELLIPSE_WALK_STEP_DEG: f64 = 0.25;

/// Segments shorter than this are skipped outright so a degenerate input can
/// never produce NaN control points.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// One scallop of a cloud curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudArc {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CloudArc {
    /// Chord length of the arc.
    pub fn chord(&self) -> f64 {
        self.from.distance_to(&self.to)
    }
}

/// Builds cloud arcs along a polyline.
///
/// Each segment is divided into `ceil(length / max_arc_size)` equal arcs.
/// Zero-length segments are skipped.
pub fn cloud_from_polyline(points: &[Point], max_arc_size: f64) -> Vec<CloudArc> {
    let mut arcs = Vec::new();
    if max_arc_size <= 0.0 {
        return arcs;
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = a.distance_to(&b);
        if length < MIN_SEGMENT_LENGTH {
            continue;
        }
        let count = (length / max_arc_size).ceil() as usize;
        let arc_len = length / count as f64;
        let dir_x = (b.x - a.x) / length;
        let dir_y = (b.y - a.y) / length;
        // Outward normal, to the left of travel direction.
        let norm_x = dir_y;
        let norm_y = -dir_x;
        let bulge = arc_len / 2.0;

        for i in 0..count {
            let start = Point::new(
                a.x + dir_x * arc_len * i as f64,
                a.y + dir_y * arc_len * i as f64,
            );
            let end = Point::new(start.x + dir_x * arc_len, start.y + dir_y * arc_len);
            let ctrl1 = Point::new(
                start.x + dir_x * arc_len * 0.25 + norm_x * bulge,
                start.y + dir_y * arc_len * 0.25 + norm_y * bulge,
            );
            let ctrl2 = Point::new(
                start.x + dir_x * arc_len * 0.75 + norm_x * bulge,
                start.y + dir_y * arc_len * 0.75 + norm_y * bulge,
            );
            arcs.push(CloudArc {
                from: start,
                ctrl1,
                ctrl2,
                to: end,
            });
        }
    }
    arcs
}

/// Builds cloud arcs around an ellipse boundary.
///
/// The circumference is estimated with Ramanujan's approximation, the
/// segment count is rounded up to a multiple of 4 for symmetry, and the
/// boundary is walked parametrically in small angular steps accumulating arc
/// length until each target segment length is reached.
pub fn cloud_from_ellipse(center: Point, rx: f64, ry: f64, max_arc_size: f64) -> Vec<CloudArc> {
    if rx <= 0.0 || ry <= 0.0 || max_arc_size <= 0.0 {
        return Vec::new();
    }
    let circumference = std::f64::consts::PI
        * (3.0 * (rx + ry) - ((3.0 * rx + ry) * (rx + 3.0 * ry)).sqrt());

    let mut segments = (circumference / max_arc_size).ceil() as usize;
    segments = segments.max(4);
    if segments % 4 != 0 {
        segments += 4 - segments % 4;
    }
    let target = circumference / segments as f64;

    let point_at = |deg: f64| {
        let t = deg.to_radians();
        Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
    };

    let mut polyline = Vec::with_capacity(segments + 1);
    let start = point_at(0.0);
    polyline.push(start);

    // The remainder past each target carries over so segment boundaries
    // track cumulative arc length; the walk may wrap a fraction of a step
    // past 360° to place the last boundary.
    let mut accumulated = 0.0;
    let mut previous = start;
    let mut deg = 0.0;
    while polyline.len() < segments {
        deg += ELLIPSE_WALK_STEP_DEG;
        let current = point_at(deg);
        accumulated += previous.distance_to(&current);
        previous = current;
        if accumulated >= target {
            polyline.push(current);
            accumulated -= target;
        }
    }
    polyline.push(start); // close the boundary

    // Slack absorbs the accumulated walk error so the closing chord still
    // maps to exactly one arc per segment.
    cloud_from_polyline(&polyline, target * 1.5)
}

/// Serializes cloud arcs to SVG path syntax.
pub fn cloud_path(arcs: &[CloudArc]) -> String {
    let mut path = String::new();
    for (i, arc) in arcs.iter().enumerate() {
        if i == 0 {
            path.push_str(&format!("M {} {} ", arc.from.x, arc.from.y));
        }
        path.push_str(&format!(
            "C {} {} {} {} {} {} ",
            arc.ctrl1.x, arc.ctrl1.y, arc.ctrl2.x, arc.ctrl2.y, arc.to.x, arc.to.y
        ));
    }
    path
}

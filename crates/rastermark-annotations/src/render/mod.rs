//! Declarative rendering layer.
//!
//! Shape variants produce an [`Appearance`] — a flat list of vector paths,
//! images, and laid-out text. The engine hands appearances to an injected
//! [`Renderer`] capability and never touches a scene graph directly, so the
//! geometry core stays technology-agnostic and unit-testable headlessly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rastermark_core::ImageContext;

pub use rastermark_core::RenderError;

use crate::geom::{HandleName, Point, Rect, TextMeasure};

mod svg;

pub use svg::SvgRenderer;

/// Extra stroke width given to transparent pick-helper copies.
const PICK_HELPER_EXTRA: f64 = 8.0;
/// Minimum pick-helper stroke width.
const PICK_HELPER_MIN: f64 = 10.0;

/// RGBA color with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` form for SVG attributes.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

impl From<[f64; 4]> for Color {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Color> for [f64; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// One vector path of an appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPath {
    /// SVG path syntax.
    pub data: String,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub dash: Vec<f64>,
    pub fill: Option<Color>,
    /// Transparent wide-stroke copy used only for hit-testing.
    pub pick_helper: bool,
}

/// A raster element of an appearance (stamp bitmaps).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderImage {
    /// Data-URL of the encoded bitmap.
    pub href: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation about the element center, radians.
    pub rotation: f64,
}

/// A laid-out line of text of an appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderText {
    pub text: String,
    pub origin: Point,
    pub font_size: f64,
    pub color: Color,
    /// Rotation about `rotation_center`, radians.
    pub rotation: f64,
    pub rotation_center: Point,
}

/// The visual form of an annotation at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appearance {
    pub paths: Vec<RenderPath>,
    pub images: Vec<RenderImage>,
    pub texts: Vec<RenderText>,
    /// Clip region, usually the image bounds.
    pub clip: Option<Rect>,
}

impl Appearance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stroked path.
    pub fn stroke(&mut self, data: String, color: Color, width: f64, dash: &[f64]) -> &mut Self {
        self.paths.push(RenderPath {
            data,
            stroke: Some(color),
            stroke_width: width,
            dash: dash.to_vec(),
            fill: None,
            pick_helper: false,
        });
        self
    }

    /// Adds a filled (optionally also stroked) path.
    pub fn fill(&mut self, data: String, fill: Color, stroke: Option<(Color, f64)>) -> &mut Self {
        let (stroke_color, stroke_width) = match stroke {
            Some((c, w)) => (Some(c), w),
            None => (None, 0.0),
        };
        self.paths.push(RenderPath {
            data,
            stroke: stroke_color,
            stroke_width,
            dash: Vec::new(),
            fill: Some(fill),
            pick_helper: false,
        });
        self
    }

    /// Appends a transparent wide-stroke copy of every stroked path, making
    /// thin lines easier to hit with a pointer.
    pub fn with_pick_helpers(mut self) -> Self {
        let helpers: Vec<RenderPath> = self
            .paths
            .iter()
            .filter(|p| p.stroke.is_some() && !p.pick_helper)
            .map(|p| RenderPath {
                data: p.data.clone(),
                stroke: Some(Color::new(0.0, 0.0, 0.0, 0.0)),
                stroke_width: (p.stroke_width + PICK_HELPER_EXTRA).max(PICK_HELPER_MIN),
                dash: Vec::new(),
                fill: None,
                pick_helper: true,
            })
            .collect();
        self.paths.extend(helpers);
        self
    }
}

/// Everything a shape needs to turn geometry into an appearance.
pub struct RenderContext<'a> {
    /// The image the annotation is (or will be) attached to.
    pub image: &'a ImageContext,
    /// External text-measurement service.
    pub text_measure: &'a dyn TextMeasure,
}

/// A control or content handle placement for the interactive shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePlacement {
    pub kind: HandleKind,
    pub at: Point,
}

/// Kind of interactive handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Corner scale handle.
    Corner(HandleName),
    /// Rotation handle above the box.
    Rotate,
    /// Structural vertex handle (line endpoints, polyline and polygon
    /// vertices), addressed by vertex index.
    Vertex(usize),
}

/// Scene-graph capability injected per annotation view.
///
/// The engine calls this; it never owns the underlying elements. `mount`
/// operations must be idempotent.
pub trait Renderer {
    /// Creates or refreshes the hit-testable controls shell.
    fn mount_controls(&mut self, uuid: Uuid, handles: &[HandlePlacement]);

    /// Replaces the annotation's visible content.
    fn update_content(&mut self, uuid: Uuid, appearance: &Appearance);

    /// Inserts a ghost copy of the content immediately after the controls.
    fn show_ghost(&mut self, uuid: Uuid, appearance: &Appearance);

    /// Repositions the ghost copy with a temporary transform
    /// (row-major `[m11, m12, m21, m22, m31, m32]`).
    fn move_ghost(&mut self, uuid: Uuid, matrix: [f64; 6]);

    /// Removes the ghost copy.
    fn remove_ghost(&mut self, uuid: Uuid);

    /// Removes every element belonging to the annotation.
    fn remove(&mut self, uuid: Uuid);
}

/// Renderer that discards everything; for headless processing and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn mount_controls(&mut self, _uuid: Uuid, _handles: &[HandlePlacement]) {}
    fn update_content(&mut self, _uuid: Uuid, _appearance: &Appearance) {}
    fn show_ghost(&mut self, _uuid: Uuid, _appearance: &Appearance) {}
    fn move_ghost(&mut self, _uuid: Uuid, _matrix: [f64; 6]) {}
    fn remove_ghost(&mut self, _uuid: Uuid) {}
    fn remove(&mut self, _uuid: Uuid) {}
}

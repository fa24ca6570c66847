//! Stamp annotation: a vector icon recipe or an embedded bitmap, placed in a
//! transformable box.

use std::io::Cursor;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::geom::{self, BBox, Point, Transform};
use crate::render::{Appearance, Color, RenderContext, RenderError, RenderImage, RenderPath};

use super::transform_box;

/// One command of an icon path, in the recipe's design coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    Close,
}

/// One path of an icon recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPath {
    pub commands: Vec<PathCmd>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub stroke: Option<Color>,
    #[serde(default = "default_icon_stroke_width")]
    pub stroke_width: f64,
}

fn default_icon_stroke_width() -> f64 {
    1.0
}

/// A vector icon in its own design space, scaled to the stamp box at render
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecipe {
    pub paths: Vec<IconPath>,
    pub design_width: f64,
    pub design_height: f64,
}

/// What the stamp displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StampContent {
    Icon(IconRecipe),
    Bitmap {
        width: u32,
        height: u32,
        /// Row-major RGBA8 pixel data.
        rgba: Vec<u8>,
    },
}

/// Stamp box with center, extents, and accumulated rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampShape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Accumulated rotation about the center, radians.
    #[serde(default)]
    pub rotation: f64,
    pub content: StampContent,
}

impl StampShape {
    pub fn new(center: Point, width: f64, height: f64, content: StampContent) -> Self {
        Self {
            center,
            width,
            height,
            rotation: 0.0,
            content,
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
        BBox::around_points(&corners, 0.0)
    }

    pub fn appearance(&self, _ctx: &RenderContext<'_>) -> Result<Appearance, RenderError> {
        match &self.content {
            StampContent::Icon(recipe) => Ok(self.icon_appearance(recipe)),
            StampContent::Bitmap {
                width,
                height,
                rgba,
            } => self.bitmap_appearance(*width, *height, rgba),
        }
    }

    /// Scales recipe-space points into the stamp box and rotates about the
    /// center.
    fn icon_appearance(&self, recipe: &IconRecipe) -> Appearance {
        let sx = if recipe.design_width > 0.0 {
            self.width / recipe.design_width
        } else {
            1.0
        };
        let sy = if recipe.design_height > 0.0 {
            self.height / recipe.design_height
        } else {
            1.0
        };
        let origin = Point::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.height / 2.0,
        );
        let rot = geom::rotate_about(self.rotation, self.center);
        let place = |p: Point| -> Point {
            Point::new(origin.x + p.x * sx, origin.y + p.y * sy).transformed(&rot)
        };

        let mut appearance = Appearance::new();
        for icon_path in &recipe.paths {
            let mut data = String::new();
            for cmd in &icon_path.commands {
                match cmd {
                    PathCmd::MoveTo(p) => {
                        let p = place(*p);
                        data.push_str(&format!("M {} {} ", p.x, p.y));
                    }
                    PathCmd::LineTo(p) => {
                        let p = place(*p);
                        data.push_str(&format!("L {} {} ", p.x, p.y));
                    }
                    PathCmd::CurveTo(c1, c2, to) => {
                        let c1 = place(*c1);
                        let c2 = place(*c2);
                        let to = place(*to);
                        data.push_str(&format!(
                            "C {} {} {} {} {} {} ",
                            c1.x, c1.y, c2.x, c2.y, to.x, to.y
                        ));
                    }
                    PathCmd::Close => data.push_str("Z "),
                }
            }
            appearance.paths.push(RenderPath {
                data,
                stroke: icon_path.stroke,
                stroke_width: icon_path.stroke_width,
                dash: Vec::new(),
                fill: icon_path.fill,
                pick_helper: false,
            });
        }
        appearance
    }

    /// Encodes the bitmap as a PNG data URL; a size mismatch between the
    /// declared dimensions and the pixel buffer is a render error.
    fn bitmap_appearance(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Appearance, RenderError> {
        let img = image::RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
            RenderError::new(format!(
                "bitmap buffer of {} bytes does not match {width}x{height}",
                rgba.len()
            ))
        })?;
        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .map_err(|e| RenderError::new(format!("png encoding failed: {e}")))?;
        let href = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&encoded)
        );

        let mut appearance = Appearance::new();
        appearance.images.push(RenderImage {
            href,
            x: self.center.x - self.width / 2.0,
            y: self.center.y - self.height / 2.0,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        });
        Ok(appearance)
    }
}

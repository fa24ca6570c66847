//! Annotation creation tools.
//!
//! Each tool is a small state machine fed with pointer events. A finished
//! draft becomes an [`crate::model::Annotation`] attached to the target
//! image's store; an invalid draft is discarded silently (logged at debug
//! level) so a stray click never interrupts the user. Tools rebind to
//! whichever image the pointer goes down on, dropping any draft left on a
//! previous image.

use serde::{Deserialize, Serialize};

use rastermark_core::ImageContext;

use crate::geom::DEFAULT_ARC_RATIO;
use crate::model::StrokeStyle;

mod box_tool;
mod line_tool;
mod pen_tool;
mod poly_tool;
mod text_tool;

pub use box_tool::{BoxKind, BoxTool};
pub use line_tool::LineTool;
pub use pen_tool::PenTool;
pub use poly_tool::PolyTool;
pub use text_tool::TextTool;

/// Style the session applies to newly created annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStyle {
    pub stroke: StrokeStyle,
    pub font_size: f64,
    /// Draw cloud-stroke variants of the shapes that support it.
    pub cloud: bool,
    /// Explicit cloud arc size; default derives from the image width.
    pub cloud_arc_size: Option<f64>,
    pub author: String,
}

impl Default for SessionStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::default(),
            font_size: 14.0,
            cloud: false,
            cloud_arc_size: None,
            author: String::new(),
        }
    }
}

impl SessionStyle {
    /// The cloud arc size to bake into a new shape, if clouds are on.
    pub fn resolve_cloud(&self, image: &ImageContext) -> Option<f64> {
        if !self.cloud {
            return None;
        }
        Some(
            self.cloud_arc_size
                .unwrap_or(image.width * DEFAULT_ARC_RATIO),
        )
    }
}

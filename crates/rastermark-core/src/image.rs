//! Image viewing context and coordinate conversion.
//!
//! Annotations live in the image's local coordinate system (origin at the
//! image's top-left corner, y down, unscaled pixels). Pointer input arrives
//! in client coordinates relative to the page. The viewer may display the
//! image rotated by a quarter turn and scaled, so the mapping between the two
//! systems depends on which rendered screen axis corresponds to which local
//! axis.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnnotationError;

/// Viewer rotation of the displayed image.
///
/// Only quarter turns are representable; anything else is rejected at the
/// boundary so interior code never sees an invalid angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageRotation {
    /// Not rotated.
    #[default]
    Deg0,
    /// Rotated 90 degrees clockwise.
    Deg90,
    /// Rotated 180 degrees.
    Deg180,
    /// Rotated 270 degrees clockwise.
    Deg270,
}

impl ImageRotation {
    /// The rotation in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            ImageRotation::Deg0 => 0,
            ImageRotation::Deg90 => 90,
            ImageRotation::Deg180 => 180,
            ImageRotation::Deg270 => 270,
        }
    }

    /// The rotation in radians.
    pub fn radians(self) -> f64 {
        (self.degrees() as f64).to_radians()
    }
}

impl TryFrom<i32> for ImageRotation {
    type Error = AnnotationError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees.rem_euclid(360) {
            0 => Ok(ImageRotation::Deg0),
            90 => Ok(ImageRotation::Deg90),
            180 => Ok(ImageRotation::Deg180),
            270 => Ok(ImageRotation::Deg270),
            _ => Err(AnnotationError::UnsupportedRotation { degrees }),
        }
    }
}

/// Bounding client rectangle of the rendered image container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientRect {
    /// Left edge in client coordinates.
    pub left: f64,
    /// Top edge in client coordinates.
    pub top: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

/// Everything the engine needs to know about the image an annotation sits on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageContext {
    /// The image's identity.
    pub uuid: Uuid,
    /// Intrinsic image width in pixels.
    pub width: f64,
    /// Intrinsic image height in pixels.
    pub height: f64,
    /// Viewer rotation.
    pub rotation: ImageRotation,
    /// Viewer scale factor.
    pub scale: f64,
    /// Where the rendered image sits on the page.
    pub client_rect: ClientRect,
}

impl ImageContext {
    /// Creates an unrotated, unscaled context at the client origin.
    pub fn new(uuid: Uuid, width: f64, height: f64) -> Self {
        Self {
            uuid,
            width,
            height,
            rotation: ImageRotation::Deg0,
            scale: 1.0,
            client_rect: ClientRect {
                left: 0.0,
                top: 0.0,
                width,
                height,
            },
        }
    }

    /// Converts a client (pointer) position to image-local coordinates.
    pub fn client_to_image(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let cx = (client_x - self.client_rect.left) / self.scale;
        let cy = (client_y - self.client_rect.top) / self.scale;
        match self.rotation {
            ImageRotation::Deg0 => (cx, cy),
            ImageRotation::Deg90 => (cy, self.height - cx),
            ImageRotation::Deg180 => (self.width - cx, self.height - cy),
            ImageRotation::Deg270 => (self.width - cy, cx),
        }
    }

    /// Converts an image-local position to client coordinates.
    ///
    /// Inverse of [`client_to_image`](Self::client_to_image) for every
    /// rotation case.
    pub fn image_to_client(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = match self.rotation {
            ImageRotation::Deg0 => (x, y),
            ImageRotation::Deg90 => (self.height - y, x),
            ImageRotation::Deg180 => (self.width - x, self.height - y),
            ImageRotation::Deg270 => (y, self.width - x),
        };
        (
            self.client_rect.left + cx * self.scale,
            self.client_rect.top + cy * self.scale,
        )
    }
}

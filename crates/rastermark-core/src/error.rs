//! Error handling for rastermark.
//!
//! Two families of errors exist:
//! - Contract errors ([`AnnotationError`]): programmer mistakes such as an
//!   unknown annotation discriminator or an unsupported image rotation.
//!   These bubble up uncaught.
//! - Render errors ([`RenderError`]): caught at the render boundary, logged,
//!   and treated as "nothing to draw this cycle" so one broken annotation
//!   never takes its siblings down with it.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;
use uuid::Uuid;

/// Contract-level annotation error.
///
/// Represents violations of the engine's invariants. These are not expected
/// to occur in correct production usage and are not caught internally.
#[derive(Error, Debug, Clone)]
pub enum AnnotationError {
    /// An unrecognized annotation type discriminator was supplied
    #[error("Unknown annotation type: {kind}")]
    UnknownKind {
        /// The discriminator string that failed to match.
        kind: String,
    },

    /// A scale gesture named a handle outside the corner set
    #[error("Unknown transform handle: {name}")]
    UnknownHandle {
        /// The handle name that failed to match.
        name: String,
    },

    /// The image rotation is not one of 0/90/180/270 degrees
    #[error("Unsupported image rotation: {degrees} degrees")]
    UnsupportedRotation {
        /// The rejected rotation value.
        degrees: i32,
    },

    /// An annotation with this uuid already exists on the image
    #[error("Duplicate annotation {uuid} on image {image}")]
    DuplicateUuid {
        /// The duplicated annotation uuid.
        uuid: Uuid,
        /// The image the annotation was attached to.
        image: Uuid,
    },

    /// The annotation is already attached to an image
    #[error("Annotation {uuid} is already attached to image {image}")]
    AlreadyAttached {
        /// The annotation uuid.
        uuid: Uuid,
        /// The image it is attached to.
        image: Uuid,
    },

    /// No annotation with this uuid exists in the collection
    #[error("Annotation {uuid} not found")]
    NotFound {
        /// The missing annotation uuid.
        uuid: Uuid,
    },
}

/// Failure while building an annotation's appearance.
///
/// Callers treat this as "skip this annotation for the current render cycle";
/// it is logged and swallowed at the render boundary.
#[derive(Error, Debug, Clone)]
#[error("Render failed: {message}")]
pub struct RenderError {
    /// Description of what went wrong.
    pub message: String,
}

impl RenderError {
    /// Creates a render error from anything displayable.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

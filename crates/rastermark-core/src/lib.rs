//! Core types, traits, and utilities for rastermark.
//!
//! This crate carries the pieces every other crate depends on: the error
//! taxonomy, the application event bus, the image viewing context used for
//! coordinate conversion, and the deferred-job queue that stands in for the
//! host environment's "next tick".

pub mod error;
pub mod events;
pub mod image;
pub mod tick;

pub use error::{AnnotationError, RenderError};
pub use events::{AnnotationEvent, EditCommand, EventBus, EventCategory, EventFilter, SubscriptionId};
pub use image::{ClientRect, ImageContext, ImageRotation};
pub use tick::DeferredQueue;

//! Annotation geometry and interactive-transformation engine.
//!
//! This crate implements the vector-annotation layer of rastermark: the
//! annotation model with its shared transform protocol, the per-shape
//! variants, the pointer-driven creation tools, the DTO persistence format,
//! and a headless SVG view. It has no dependency on any particular scene
//! graph; rendering goes through the [`render::Renderer`] capability.

pub mod dto;
pub mod file;
pub mod geom;
pub mod interact;
pub mod model;
pub mod render;
pub mod store;
pub mod tools;
pub mod view;

pub use dto::AnnotationDto;
pub use file::AnnotationFile;
pub use geom::{BBox, HandleName, Point, Transform};
pub use interact::{GestureKind, PointerEvent, TransformGesture};
pub use model::{Annotation, AnnotationKind, Shape, StrokeStyle};
pub use render::{Appearance, RenderContext, Renderer};
pub use store::ImageAnnotations;
pub use tools::SessionStyle;
pub use view::AnnotationLayer;

//! View glue between the annotation store and a renderer.
//!
//! The layer walks a store, renders every visible annotation through the
//! injected renderer, and turns user intents (select, focus) into bus
//! events. Text annotations whose boxes can only be measured after the host
//! lays out fresh content are queued for a deferred re-render on the host's
//! next tick.

use uuid::Uuid;

use rastermark_core::{AnnotationEvent, DeferredQueue, EventBus};

use crate::model::AnnotationKind;
use crate::render::{RenderContext, Renderer};
use crate::store::ImageAnnotations;

/// Renders one image's annotations and dispatches interaction intents.
#[derive(Default)]
pub struct AnnotationLayer {
    bus: EventBus,
    remeasure: DeferredQueue<Uuid>,
}

impl AnnotationLayer {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            remeasure: DeferredQueue::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Renders every visible annotation; deleted ones are unmounted.
    ///
    /// Returns how many annotations produced an appearance. A failed
    /// appearance is logged inside [`crate::model::Annotation::render`] and
    /// skipped, leaving its siblings untouched. Freshly rendered text
    /// annotations are queued for re-measurement.
    pub fn render_all(
        &mut self,
        store: &ImageAnnotations,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
    ) -> usize {
        let mut rendered = 0;
        for annotation in store.iter() {
            if annotation.deleted() {
                renderer.remove(annotation.uuid());
                continue;
            }
            if annotation.render(ctx, renderer).is_some() {
                rendered += 1;
                if annotation.kind() == AnnotationKind::Text {
                    self.remeasure.defer(annotation.uuid());
                }
            }
        }
        rendered
    }

    /// Re-renders annotations queued for post-layout measurement.
    pub fn flush_deferred(
        &mut self,
        store: &ImageAnnotations,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
    ) {
        for uuid in self.remeasure.drain() {
            if let Some(annotation) = store.get(uuid) {
                if !annotation.deleted() {
                    annotation.render(ctx, renderer);
                }
            }
        }
    }

    /// Whether any deferred re-measurement is pending.
    pub fn has_deferred(&self) -> bool {
        !self.remeasure.is_empty()
    }

    /// Announces a selection.
    pub fn select(&self, uuid: Uuid) {
        self.bus.publish(AnnotationEvent::Selected { uuid });
    }

    /// Requests that the host bring the annotation into view.
    pub fn focus(&self, uuid: Uuid) {
        self.bus.publish(AnnotationEvent::FocusRequested { uuid });
    }
}

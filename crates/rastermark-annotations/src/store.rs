//! Per-image annotation collection.

use uuid::Uuid;

use rastermark_core::{AnnotationError, AnnotationEvent, EditCommand, EventBus};

use crate::dto::AnnotationDto;
use crate::model::Annotation;

/// All annotations attached to one image, in insertion (z) order.
#[derive(Debug, Clone)]
pub struct ImageAnnotations {
    image_uuid: Uuid,
    items: Vec<Annotation>,
}

impl ImageAnnotations {
    pub fn new(image_uuid: Uuid) -> Self {
        Self {
            image_uuid,
            items: Vec::new(),
        }
    }

    pub fn image_uuid(&self) -> Uuid {
        self.image_uuid
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Attaches an annotation to this image.
    ///
    /// Rejects duplicate uuids and annotations already attached elsewhere.
    /// Publishes the lifecycle event on success.
    pub fn attach(
        &mut self,
        mut annotation: Annotation,
        bus: Option<&EventBus>,
    ) -> Result<Uuid, AnnotationError> {
        let uuid = annotation.uuid();
        if self.items.iter().any(|a| a.uuid() == uuid) {
            return Err(AnnotationError::DuplicateUuid {
                uuid,
                image: self.image_uuid,
            });
        }
        if annotation.image_uuid() != Some(self.image_uuid) {
            annotation.attach_to(self.image_uuid)?;
        }
        self.items.push(annotation);
        tracing::debug!(annotation = %uuid, image = %self.image_uuid, "annotation attached");
        if let Some(bus) = bus {
            bus.publish(AnnotationEvent::Added {
                uuid,
                image: self.image_uuid,
            });
        }
        Ok(uuid)
    }

    pub fn get(&self, uuid: Uuid) -> Option<&Annotation> {
        self.items.iter().find(|a| a.uuid() == uuid)
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut Annotation> {
        self.items.iter_mut().find(|a| a.uuid() == uuid)
    }

    /// Every annotation, deleted ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    /// Annotations that should currently be shown.
    pub fn iter_visible(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter(|a| !a.deleted())
    }

    /// Marks an annotation deleted without removing it, so the edit can be
    /// undone. Publishes the lifecycle event and the restoring edit request.
    pub fn soft_delete(
        &mut self,
        uuid: Uuid,
        bus: Option<&EventBus>,
    ) -> Result<(), AnnotationError> {
        let annotation = self
            .get_mut(uuid)
            .ok_or(AnnotationError::NotFound { uuid })?;
        annotation.set_deleted(true);
        if let Some(bus) = bus {
            bus.publish(AnnotationEvent::Deleted { uuid });
            bus.publish(AnnotationEvent::EditRequested {
                uuid,
                undo: EditCommand::Restore { uuid },
            });
        }
        Ok(())
    }

    /// Reverses a soft delete.
    pub fn restore(&mut self, uuid: Uuid) -> Result<(), AnnotationError> {
        let annotation = self
            .get_mut(uuid)
            .ok_or(AnnotationError::NotFound { uuid })?;
        annotation.set_deleted(false);
        Ok(())
    }

    /// Wire representation of the live annotations; soft-deleted ones are
    /// not exported.
    pub fn export(&self) -> Vec<AnnotationDto> {
        self.iter_visible().map(Annotation::to_dto).collect()
    }
}

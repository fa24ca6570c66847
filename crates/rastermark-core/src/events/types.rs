//! Event and command definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reversible edit, emitted alongside every undoable mutation.
///
/// Commands carry structured data (target uuid plus the state needed to
/// revert) rather than opaque closures, so the host's undo stack can be
/// inspected or serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditCommand {
    /// Revert a geometric mutation by applying the inverse affine matrix.
    ///
    /// The matrix is row-major `[m11, m12, m21, m22, m31, m32]`.
    Transform {
        /// The annotation to transform back.
        uuid: Uuid,
        /// The inverse of the committed transform.
        inverse: [f64; 6],
    },
    /// Restore the previous text content.
    SetText {
        /// The annotation whose text changed.
        uuid: Uuid,
        /// The content before the edit.
        previous: Option<String>,
    },
    /// Re-insert a soft-deleted annotation.
    Restore {
        /// The annotation that was deleted.
        uuid: Uuid,
    },
}

impl EditCommand {
    /// The annotation this command targets.
    pub fn target(&self) -> Uuid {
        match self {
            EditCommand::Transform { uuid, .. } => *uuid,
            EditCommand::SetText { uuid, .. } => *uuid,
            EditCommand::Restore { uuid } => *uuid,
        }
    }
}

/// Coarse event category used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Selection and focus intents.
    Selection,
    /// Undoable edits.
    Edit,
    /// Annotation lifecycle (add/delete).
    Lifecycle,
}

/// Application-level annotation events.
#[derive(Debug, Clone)]
pub enum AnnotationEvent {
    /// An annotation was selected.
    Selected {
        /// The selected annotation.
        uuid: Uuid,
    },
    /// An annotation requested focus (e.g. scroll-into-view).
    FocusRequested {
        /// The annotation requesting focus.
        uuid: Uuid,
    },
    /// An undoable edit happened; `undo` reverts it.
    EditRequested {
        /// The mutated annotation.
        uuid: Uuid,
        /// The command that reverts the edit.
        undo: EditCommand,
    },
    /// An annotation was attached to an image.
    Added {
        /// The new annotation.
        uuid: Uuid,
        /// The owning image.
        image: Uuid,
    },
    /// An annotation was soft-deleted.
    Deleted {
        /// The deleted annotation.
        uuid: Uuid,
    },
}

impl AnnotationEvent {
    /// The category this event belongs to.
    pub fn category(&self) -> EventCategory {
        match self {
            AnnotationEvent::Selected { .. } | AnnotationEvent::FocusRequested { .. } => {
                EventCategory::Selection
            }
            AnnotationEvent::EditRequested { .. } => EventCategory::Edit,
            AnnotationEvent::Added { .. } | AnnotationEvent::Deleted { .. } => {
                EventCategory::Lifecycle
            }
        }
    }

    /// The annotation the event concerns.
    pub fn uuid(&self) -> Uuid {
        match self {
            AnnotationEvent::Selected { uuid }
            | AnnotationEvent::FocusRequested { uuid }
            | AnnotationEvent::EditRequested { uuid, .. }
            | AnnotationEvent::Added { uuid, .. }
            | AnnotationEvent::Deleted { uuid } => *uuid,
        }
    }
}

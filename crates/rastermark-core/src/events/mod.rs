//! Application event layer.
//!
//! The annotation engine never owns an undo stack; it only emits
//! edit-requests carrying a reversible [`EditCommand`] value. Whoever
//! subscribes to the bus (typically the widget shell) owns the stack.

mod bus;
mod types;

pub use bus::{EventBus, EventBusConfig, EventFilter, SubscriptionId};
pub use types::{AnnotationEvent, EditCommand, EventCategory};

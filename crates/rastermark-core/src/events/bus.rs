//! Event bus implementation.
//!
//! A synchronous handler registry: publishing invokes every matching handler
//! before returning. The annotation engine runs on a single-threaded event
//! loop, so there is no async delivery half.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

use super::types::{AnnotationEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AnnotationEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(&AnnotationEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 1000,
        }
    }
}

/// Central event bus for annotation events.
///
/// Cheap to clone; clones share the same handler registry.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    history: Arc<RwLock<VecDeque<AnnotationEvent>>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Publish an event to all matching handlers.
    ///
    /// Returns the number of handlers that received the event.
    pub fn publish(&self, event: AnnotationEvent) -> usize {
        if self.config.enable_history {
            let mut history = self.history.write();
            if history.len() >= self.config.max_history_size {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(&event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Register a handler for all events.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&AnnotationEvent) + Send + Sync + 'static,
    {
        self.subscribe_filtered(EventFilter::All, handler)
    }

    /// Register a handler with a category filter.
    pub fn subscribe_filtered<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AnnotationEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers
            .write()
            .insert(id, (filter, Box::new(handler)));
        tracing::debug!("registered event handler {id}");
        id
    }

    /// Remove a previously registered handler.
    ///
    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.write().remove(&id).is_some()
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Snapshot of the retained event history.
    ///
    /// Empty unless `enable_history` is set in the configuration.
    pub fn history(&self) -> Vec<AnnotationEvent> {
        self.history.read().iter().cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn publish_reaches_matching_handlers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe_filtered(
            EventFilter::Categories(vec![EventCategory::Selection]),
            move |ev| sink.lock().push(ev.uuid()),
        );

        let uuid = Uuid::new_v4();
        let delivered = bus.publish(AnnotationEvent::Selected { uuid });
        assert_eq!(delivered, 1);

        let delivered = bus.publish(AnnotationEvent::Deleted { uuid });
        assert_eq!(delivered, 0);

        assert_eq!(seen.lock().as_slice(), &[uuid]);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let bus = EventBus::new();
        let id = bus.subscribe(|_| {});
        assert_eq!(bus.handler_count(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let bus = EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 2,
        });
        for _ in 0..3 {
            bus.publish(AnnotationEvent::Selected {
                uuid: Uuid::new_v4(),
            });
        }
        assert_eq!(bus.history().len(), 2);
    }
}

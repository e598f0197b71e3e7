//! # orbit_event - Typed Event Bus
//!
//! Observer-pattern notification for the editor core:
//! - Typed events, any `Send + Sync + 'static` value
//! - Explicit subscription tokens (`SubscriberId`) that must be returned via
//!   `unsubscribe` on teardown
//! - Queued delivery: `publish` enqueues, `process` dispatches in priority
//!   order, so a mutation never re-enters its own observers

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, VecDeque};

use parking_lot::Mutex;

/// Event priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Event envelope containing metadata
pub struct EventEnvelope {
    /// Event type ID
    pub type_id: TypeId,
    /// Event data
    pub data: Box<dyn Any + Send + Sync>,
    /// Priority
    pub priority: Priority,
    /// Publish sequence number
    pub sequence: u64,
}

impl EventEnvelope {
    /// Create a new envelope
    pub fn new<E: Event>(event: E, priority: Priority, sequence: u64) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            data: Box::new(event),
            priority,
            sequence,
        }
    }

    /// Try to downcast to specific event type
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.data.downcast_ref::<E>()
    }
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Event for T {}

/// Dynamic event handler
type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscription token returned by `subscribe`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

#[derive(Default)]
struct Queue {
    events: VecDeque<EventEnvelope>,
    next_sequence: u64,
}

/// Event bus for publishing and subscribing to events
pub struct EventBus {
    queue: Mutex<Queue>,
    handlers: BTreeMap<TypeId, Vec<(SubscriberId, Priority, DynamicHandler)>>,
    next_subscriber_id: u64,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Queue::default()),
            handlers: BTreeMap::new(),
            next_subscriber_id: 1,
        }
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        self.publish_with_priority(event, Priority::Normal);
    }

    /// Publish an event with priority
    pub fn publish_with_priority<E: Event>(&self, event: E, priority: Priority) {
        let mut queue = self.queue.lock();
        let sequence = queue.next_sequence;
        queue.next_sequence += 1;
        queue.events.push_back(EventEnvelope::new(event, priority, sequence));
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<E: Event, F>(
        &mut self,
        handler: F,
        priority: Priority,
    ) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let handlers = self.handlers.entry(TypeId::of::<E>()).or_default();
        handlers.push((id, priority, wrapped_handler));
        // Stable: equal priorities keep subscription order
        handlers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Remove a subscription. Returns false if the token was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut removed = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub_id, _, _)| *sub_id != id);
            removed |= handlers.len() != before;
        }
        self.handlers.retain(|_, handlers| !handlers.is_empty());
        if !removed {
            log::warn!("unsubscribe called with unknown subscriber {:?}", id);
        }
        removed
    }

    /// Drop every subscription
    pub fn clear_subscribers(&mut self) {
        self.handlers.clear();
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Dispatch all pending events. Returns the number of events processed.
    pub fn process(&mut self) -> usize {
        let mut events: Vec<EventEnvelope> = self.queue.lock().events.drain(..).collect();

        // Higher priority first, publish order within a priority
        events.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.sequence.cmp(&b.sequence)));

        for envelope in &events {
            if let Some(handlers) = self.handlers.get(&envelope.type_id) {
                for (_, _, handler) in handlers {
                    handler(envelope.data.as_ref());
                }
            }
        }

        events.len()
    }

    /// Clear all events without processing
    pub fn clear(&self) {
        self.queue.lock().events.clear();
    }

    /// Get pending event count
    pub fn pending_count(&self) -> usize {
        self.queue.lock().events.len()
    }

    /// Check if there are pending events
    pub fn has_pending(&self) -> bool {
        !self.queue.lock().events.is_empty()
    }

    /// Pending events of one type, oldest first, without dispatching them.
    pub fn peek<E: Event + Clone>(&self) -> Vec<E> {
        self.queue
            .lock()
            .events
            .iter()
            .filter_map(|envelope| envelope.downcast_ref::<E>().cloned())
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventEnvelope, Priority, SubscriberId};
}

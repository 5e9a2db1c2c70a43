//! Synchronous publish/subscribe.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::{EventData, EventKind, GameEvent};

/// What a handler reports back to the bus.
pub type HandlerResult = Result<(), String>;

/// A subscribed callback. Identity is the allocation, so subscribe a clone of
/// the same `Arc` to refer to the same handler again.
pub type EventHandler = Arc<dyn Fn(&GameEvent) -> HandlerResult + Send + Sync>;

/// A handler that failed while an event was being delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// The event type being delivered.
    pub kind: EventKind,
    /// Position of the handler in the subscription list.
    pub position: usize,
    /// The error message or panic payload.
    pub message: String,
    /// Whether the handler panicked rather than returning an error.
    pub panicked: bool,
}

/// The outcome of one [`EventBus::publish`] call.
#[derive(Debug, Clone)]
pub struct Published {
    /// The event that was delivered.
    pub event: GameEvent,
    /// Handlers that failed, in delivery order.
    pub failures: Vec<HandlerFailure>,
}

impl Published {
    /// Whether every handler succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Routes events to handlers subscribed by event type.
///
/// Delivery is synchronous and follows subscription order. A failing handler
/// never stops the others and never fails the publisher.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<EventHandler>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .subscribers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}

fn same_handler(a: &EventHandler, b: &EventHandler) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler. Returns `false` if it was already subscribed
    /// to this kind.
    pub fn subscribe(&mut self, kind: EventKind, handler: EventHandler) -> bool {
        let handlers = self.subscribers.entry(kind).or_default();
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, kind: &EventKind, handler: &EventHandler) -> bool {
        let Some(handlers) = self.subscribers.get_mut(kind) else {
            return false;
        };
        let Some(position) = handlers.iter().position(|h| same_handler(h, handler)) else {
            return false;
        };
        handlers.remove(position);
        true
    }

    /// Build an event and deliver it to every handler of its kind.
    pub fn publish(&self, kind: EventKind, data: EventData) -> Published {
        let event = GameEvent::new(kind, data);
        let mut failures = Vec::new();

        let handlers = self
            .subscribers
            .get(&event.kind)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (position, handler) in handlers.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&event)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(message)) => HandlerFailure {
                    kind: event.kind.clone(),
                    position,
                    message,
                    panicked: false,
                },
                Err(payload) => HandlerFailure {
                    kind: event.kind.clone(),
                    position,
                    message: panic_message(&*payload),
                    panicked: true,
                },
            };
            tracing::warn!(
                event = %failure.kind,
                position = failure.position,
                panicked = failure.panicked,
                "event handler failed: {}",
                failure.message
            );
            failures.push(failure);
        }

        Published { event, failures }
    }

    /// Drop the subscribers of one kind, or of every kind.
    pub fn clear(&mut self, kind: Option<&EventKind>) {
        match kind {
            Some(kind) => {
                if let Some(handlers) = self.subscribers.get_mut(kind) {
                    handlers.clear();
                }
            }
            None => self.subscribers.clear(),
        }
    }

    /// Number of handlers subscribed to a kind.
    pub fn subscriber_count(&self, kind: &EventKind) -> usize {
        self.subscribers.get(kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> EventHandler {
        let log = Arc::clone(log);
        Arc::new(move |event: &GameEvent| -> HandlerResult {
            log.lock().unwrap().push(format!("{tag}:{}", event.kind));
            Ok(())
        })
    }

    #[test]
    fn delivers_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::PlayerMoved, recorder(&log, "a"));
        bus.subscribe(EventKind::PlayerMoved, recorder(&log, "b"));
        bus.subscribe(EventKind::ItemDropped, recorder(&log, "c"));

        let published = bus.publish(EventKind::PlayerMoved, EventData::new());
        assert!(published.is_clean());
        assert_eq!(published.event.kind, EventKind::PlayerMoved);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:player_moved", "b:player_moved"]
        );
    }

    #[test]
    fn custom_name_subscription_receives_builtin_event() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::Custom("player_moved".into()), recorder(&log, "a"));
        assert_eq!(bus.subscriber_count(&EventKind::PlayerMoved), 1);

        bus.publish(EventKind::PlayerMoved, EventData::new());
        assert_eq!(*log.lock().unwrap(), vec!["a:player_moved"]);
    }

    #[test]
    fn duplicate_subscription_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler = recorder(&log, "a");
        let mut bus = EventBus::new();
        assert!(bus.subscribe(EventKind::LevelUp, Arc::clone(&handler)));
        assert!(!bus.subscribe(EventKind::LevelUp, Arc::clone(&handler)));
        assert_eq!(bus.subscriber_count(&EventKind::LevelUp), 1);

        // Same handler under another kind is a separate subscription.
        assert!(bus.subscribe(EventKind::GameSaved, handler));
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::LevelUp, Arc::clone(&a));
        bus.subscribe(EventKind::LevelUp, Arc::clone(&b));

        assert!(bus.unsubscribe(&EventKind::LevelUp, &a));
        assert!(!bus.unsubscribe(&EventKind::LevelUp, &a));
        assert!(!bus.unsubscribe(&EventKind::GameSaved, &b));

        bus.publish(EventKind::LevelUp, EventData::new());
        assert_eq!(*log.lock().unwrap(), vec!["b:level_up"]);
    }

    #[test]
    fn failures_are_isolated_and_reported() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(
            EventKind::ItemUsed,
            Arc::new(|_: &GameEvent| -> HandlerResult { Err("disk full".to_string()) }),
        );
        bus.subscribe(
            EventKind::ItemUsed,
            Arc::new(|_: &GameEvent| -> HandlerResult { panic!("boom") }),
        );
        bus.subscribe(EventKind::ItemUsed, recorder(&log, "last"));

        let published = bus.publish(EventKind::ItemUsed, EventData::new());
        assert_eq!(published.failures.len(), 2);
        assert_eq!(published.failures[0].message, "disk full");
        assert_eq!(published.failures[0].position, 0);
        assert!(!published.failures[0].panicked);
        assert_eq!(published.failures[1].message, "boom");
        assert!(published.failures[1].panicked);
        assert_eq!(*log.lock().unwrap(), vec!["last:item_used"]);
    }

    #[test]
    fn publish_without_subscribers_returns_event() {
        let bus = EventBus::new();
        let published = bus.publish(EventKind::Custom("bell".into()), EventData::new());
        assert!(published.is_clean());
        assert_eq!(published.event.kind.as_str(), "bell");
    }

    #[test]
    fn clear_one_or_all() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::LevelUp, recorder(&log, "a"));
        bus.subscribe(EventKind::GameSaved, recorder(&log, "b"));

        bus.clear(Some(&EventKind::LevelUp));
        assert_eq!(bus.subscriber_count(&EventKind::LevelUp), 0);
        assert_eq!(bus.subscriber_count(&EventKind::GameSaved), 1);

        bus.clear(None);
        assert_eq!(bus.subscriber_count(&EventKind::GameSaved), 0);
    }
}

//! Bounded history of published events.

use super::{EventKind, GameEvent};

/// Events the engine has published, oldest first.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLog {
    /// An empty history keeping at most `max_events` entries. 0 keeps everything.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Record a published event. Past capacity, the oldest entries go.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
        if self.max_events == 0 {
            return;
        }
        let overflow = self.events.len().saturating_sub(self.max_events);
        if overflow > 0 {
            self.events.drain(..overflow);
        }
    }

    /// The recorded events.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Recorded events of one kind.
    pub fn of_kind(&self, kind: &EventKind) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| &e.kind == kind).collect()
    }

    /// How many recorded events have this kind.
    pub fn count(&self, kind: &EventKind) -> usize {
        self.events.iter().filter(|e| &e.kind == kind).count()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

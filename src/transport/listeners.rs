//! Listener bookkeeping shared by every transport implementation.

use std::collections::BTreeMap;

use super::{EventKind, TransportEvent};

/// A lifecycle handler. Runs on whichever thread dispatches the event.
pub type Listener = Box<dyn FnMut(&TransportEvent) + Send>;

/// Handle returned by `add_listener`, used to remove the listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Listeners keyed by registration order.
///
/// Dispatch calls every listener registered for the event's kind, oldest first.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: BTreeMap<ListenerId, (EventKind, Listener)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, (kind, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn dispatch(&mut self, event: &TransportEvent) {
        let kind = event.kind();
        for (listener_kind, listener) in self.listeners.values_mut() {
            if *listener_kind == kind {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|(k, _)| *k == kind).count()
    }
}

//! Socket event listeners

use std::collections::HashMap;
use std::sync::Arc;

use chat_core::{EventKind, ServerEvent};
use parking_lot::RwLock;

/// Callback invoked for each matching event
pub type Listener = Arc<dyn Fn(&ServerEvent) + Send + Sync>;

/// Event listeners, keyed by event name
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener alongside any existing ones
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&ServerEvent) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .entry(kind)
            .or_default()
            .push(Arc::new(listener));
    }

    /// Make `listener` the only one for `kind`
    pub fn replace<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&ServerEvent) + Send + Sync + 'static,
    {
        self.listeners.write().insert(kind, vec![Arc::new(listener)]);
    }

    /// Remove every listener for `kind`, returning how many were removed
    pub fn off(&self, kind: EventKind) -> usize {
        self.listeners
            .write()
            .remove(&kind)
            .map_or(0, |removed| removed.len())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.read().get(&kind).map_or(0, Vec::len)
    }

    /// Call every listener registered for the event's kind
    ///
    /// Listeners run without the registry lock held, so they may register or
    /// remove listeners themselves.
    pub fn dispatch(&self, event: &ServerEvent) -> usize {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<EventKind, usize> = self
            .listeners
            .read()
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("ListenerRegistry").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::Snowflake;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn presence() -> ServerEvent {
        ServerEvent::GetOnlineUsers(vec![Snowflake::new(1)])
    }

    #[test]
    fn test_dispatch_by_kind() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        registry.on(EventKind::GetOnlineUsers, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(registry.dispatch(&presence()), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.listener_count(EventKind::NewMessage), 0);
    }

    #[test]
    fn test_replace_keeps_exactly_one() {
        let registry = ListenerRegistry::new();
        registry.on(EventKind::NewMessage, |_| {});
        registry.on(EventKind::NewMessage, |_| {});
        assert_eq!(registry.listener_count(EventKind::NewMessage), 2);

        registry.replace(EventKind::NewMessage, |_| {});
        registry.replace(EventKind::NewMessage, |_| {});
        assert_eq!(registry.listener_count(EventKind::NewMessage), 1);
    }

    #[test]
    fn test_off() {
        let registry = ListenerRegistry::new();
        registry.on(EventKind::NewMessage, |_| {});
        assert_eq!(registry.off(EventKind::NewMessage), 1);
        assert_eq!(registry.off(EventKind::NewMessage), 0);
    }

    #[test]
    fn test_listener_may_remove_itself() {
        let registry = Arc::new(ListenerRegistry::new());
        let inner = Arc::clone(&registry);
        registry.on(EventKind::GetOnlineUsers, move |_| {
            inner.off(EventKind::GetOnlineUsers);
        });

        registry.dispatch(&presence());
        assert_eq!(registry.listener_count(EventKind::GetOnlineUsers), 0);
    }
}

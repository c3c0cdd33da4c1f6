use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

pub type EventSender = UnboundedSender<Result<Event, Infallible>>;

/// Connection information (no redundant connection_id)
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub sender: EventSender,
}

/// Registry of every live SSE connection, keyed by connection id.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(&self, sender: EventSender) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections
            .insert(connection_id.clone(), ConnectionInfo { sender });

        connection_id
    }

    /// Unregister a connection - O(1). Unknown ids are ignored.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send message to a single connection. Returns whether it was handed to the connection.
    pub fn send_to_connection(&self, connection_id: &ConnectionId, event: Event) -> bool {
        let Some(info) = self.connections.get(connection_id) else {
            debug!(
                "No SSE connection {} registered, dropping event",
                connection_id.as_str()
            );
            return false;
        };

        if let Err(e) = info.sender.send(Ok(event)) {
            warn!(
                "Failed to send event to connection {}: {}. Connection will be cleaned up.",
                connection_id.as_str(),
                e
            );
            drop(info); // Release shard lock before removal
            self.connections.remove(connection_id);
            return false;
        }

        true
    }

    /// Broadcast message to all connections - O(n). Returns the number of connections
    /// the event was handed to. Connections whose receiver is gone are dropped.
    pub fn broadcast(&self, event: Event) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.connections.iter() {
            match entry.value().sender.send(Ok(event.clone())) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(
                        "Failed to send broadcast to connection {}: {}",
                        entry.key().as_str(),
                        e
                    );
                    closed.push(entry.key().clone());
                }
            }
        }

        // Removal has to wait until iteration has released its shard locks
        for connection_id in closed {
            self.connections.remove(&connection_id);
        }

        delivered
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx);

        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn broadcast_reaches_every_registered_connection_once() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.register(tx1);
        registry.register(tx2);

        let delivered = registry.broadcast(Event::default().data("hello"));

        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn broadcast_drops_closed_connections_without_failing_the_rest() {
        let registry = ConnectionRegistry::new();
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let (open_tx, mut open_rx) = mpsc::unbounded_channel();
        registry.register(closed_tx);
        registry.register(open_tx);
        drop(closed_rx);

        let delivered = registry.broadcast(Event::default().data("hello"));

        assert_eq!(delivered, 1);
        assert!(open_rx.try_recv().is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn connection_registered_after_a_broadcast_receives_nothing() {
        let registry = ConnectionRegistry::new();
        registry.broadcast(Event::default().data("early"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_to_connection_targets_only_that_connection() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = registry.register(tx1);
        registry.register(tx2);

        assert!(registry.send_to_connection(&id1, Event::default().data("hi")));
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());

        registry.unregister(&id1);
        assert!(!registry.send_to_connection(&id1, Event::default().data("hi")));
    }
}

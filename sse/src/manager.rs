use crate::connection::{ConnectionId, ConnectionRegistry, EventSender};
use crate::message::{EventType, Message as SseMessage, MessageScope};
use axum::response::sse::Event;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(&self, sender: EventSender) -> ConnectionId {
        let connection_id = self.registry.register(sender);
        info!(
            "Client connected: {} ({} active)",
            connection_id.as_str(),
            self.registry.len()
        );
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if self.registry.unregister(connection_id) {
            info!(
                "Client disconnected: {} ({} active)",
                connection_id.as_str(),
                self.registry.len()
            );
        }
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Send a message based on its scope. Returns how many connections it was handed to.
    pub fn send_message(&self, message: SseMessage) -> usize {
        let event_type = message.event.event_type();

        let event_data = match serde_json::to_string(&message.event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return 0;
            }
        };

        let event = Event::default().event(event_type).data(event_data);

        match message.scope {
            MessageScope::Connection { connection_id } => {
                usize::from(self.registry.send_to_connection(&connection_id, event))
            }
            MessageScope::Broadcast => {
                info!(
                    "Broadcasting {event_type} to {} connection(s)",
                    self.registry.len()
                );
                let delivered = self.registry.broadcast(event);
                debug!("{event_type} broadcast complete, delivered to {delivered}");
                delivered
            }
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Event as SseEvent;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[test]
    fn broadcast_message_reaches_all_connections() {
        let manager = Manager::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        manager.register_connection(tx1);
        manager.register_connection(tx2);

        let delivered = manager.send_message(SseMessage {
            event: SseEvent::ProductAdded {
                product: json!({"id": 1}),
            },
            scope: MessageScope::Broadcast,
        });

        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn connection_scoped_message_reaches_only_its_target() {
        let manager = Manager::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = manager.register_connection(tx1);
        manager.register_connection(tx2);

        let delivered = manager.send_message(SseMessage {
            event: SseEvent::Connected {
                connection_id: id1.as_str().to_string(),
            },
            scope: MessageScope::Connection {
                connection_id: id1.clone(),
            },
        });

        assert_eq!(delivered, 1);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn unregistered_connections_stop_receiving() {
        let manager = Manager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = manager.register_connection(tx);
        manager.unregister_connection(&id);
        manager.unregister_connection(&id);

        let delivered = manager.send_message(SseMessage {
            event: SseEvent::ProductDeleted { product_id: 1 },
            scope: MessageScope::Broadcast,
        });

        assert_eq!(delivered, 0);
        assert_eq!(manager.connection_count(), 0);
        assert!(rx.try_recv().is_err());
    }
}

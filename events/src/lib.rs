//! Event system infrastructure for the product catalog.
//!
//! This crate provides the event system that decouples catalog mutations from
//! infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A type alias that represents a product's id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = i32;

/// Domain events that represent changes to the catalog.
/// These events are emitted after a mutation has been applied to the store.
///
/// Every event is meant for all connected clients; there is no per-user routing.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// Emitted when a new product is added to the catalog.
    ProductCreated {
        /// Complete serialized product (id, name, price, description, lastUpdated).
        product: Value,
    },
    /// Emitted when a product's fields are replaced.
    ProductUpdated {
        /// Complete post-update product, not a delta.
        product: Value,
    },
    /// Emitted when a product is removed from the catalog.
    ProductDeleted {
        /// ID of the deleted product (full record not included since it no longer exists).
        product_id: Id,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ProductCreated { .. } => "ProductCreated",
            DomainEvent::ProductUpdated { .. } => "ProductUpdated",
            DomainEvent::ProductDeleted { .. } => "ProductDeleted",
        }
    }
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers and wait for each to finish.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.name()));
        }
    }

    #[tokio::test]
    async fn publish_calls_handlers_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(Recorder {
                label: "first",
                log: log.clone(),
            }))
            .with_handler(Arc::new(Recorder {
                label: "second",
                log: log.clone(),
            }));

        publisher
            .publish(DomainEvent::ProductDeleted { product_id: 1 })
            .await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:ProductDeleted", "second:ProductDeleted"]
        );
    }

    #[tokio::test]
    async fn with_handler_leaves_the_original_publisher_untouched() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let original = EventPublisher::new();
        let extended = original.clone().with_handler(Arc::new(Recorder {
            label: "only",
            log: log.clone(),
        }));

        original
            .publish(DomainEvent::ProductCreated {
                product: json!({"id": 1}),
            })
            .await;

        assert_eq!(original.handler_count(), 0);
        assert_eq!(extended.handler_count(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        EventPublisher::default()
            .publish(DomainEvent::ProductUpdated {
                product: json!({"id": 3}),
            })
            .await;
    }
}

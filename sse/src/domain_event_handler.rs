use crate::message::{Event as SseEvent, Message as SseMessage, MessageScope};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE messages and broadcasting them to
/// every connected client.
///
/// Delivery is at-most-once: clients that are not connected when the event fires never
/// see it, and nothing is retried.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }

    fn to_sse_event(event: &DomainEvent) -> SseEvent {
        match event {
            DomainEvent::ProductCreated { product } => SseEvent::ProductAdded {
                product: product.clone(),
            },
            DomainEvent::ProductUpdated { product } => SseEvent::ProductUpdated {
                product: product.clone(),
            },
            DomainEvent::ProductDeleted { product_id } => SseEvent::ProductDeleted {
                product_id: *product_id,
            },
        }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        debug!("Handling {} event", event.name());

        self.sse_manager.send_message(SseMessage {
            event: Self::to_sse_event(event),
            scope: MessageScope::Broadcast,
        });
    }
}

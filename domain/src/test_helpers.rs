use async_trait::async_trait;
use events::{DomainEvent, EventHandler, EventPublisher};
use std::sync::{Arc, Mutex};

/// Event handler that keeps every event it sees, in order.
#[derive(Clone, Default)]
pub(crate) struct RecordingHandler {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingHandler {
    /// A publisher with a single recording handler attached.
    pub(crate) fn publisher() -> (EventPublisher, RecordingHandler) {
        let handler = RecordingHandler::default();
        let publisher = EventPublisher::new().with_handler(Arc::new(handler.clone()));
        (publisher, handler)
    }

    pub(crate) fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &DomainEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

use config::Config;
use entity_api::product::ProductStore;
use events::EventPublisher;
use sse::{Manager, SseDomainEventHandler};
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state shared by every request handler
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub product_store: Arc<ProductStore>,
    pub event_publisher: Arc<EventPublisher>,
    pub sse_manager: Arc<Manager>,
    pub config: Config,
}

impl AppState {
    /// Builds the state with an empty catalog and the SSE fan-out registered as the
    /// domain event handler.
    pub fn new(app_config: Config) -> Self {
        let sse_manager = Arc::new(Manager::new());
        let event_publisher = EventPublisher::new()
            .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));

        Self {
            product_store: Arc::new(ProductStore::new()),
            event_publisher: Arc::new(event_publisher),
            sse_manager,
            config: app_config,
        }
    }

    pub fn product_store_ref(&self) -> &ProductStore {
        self.product_store.as_ref()
    }
}

use anyhow::{Context, Result};
use log::*;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use crate::api_client::ApiClient;
use crate::mirror::ProductMirror;
use crate::product::Product;
use crate::sse_client::{Connection, Signal};

/// The product event kinds a session can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EventKind {
    #[value(name = "product_added")]
    ProductAdded,
    #[value(name = "product_updated")]
    ProductUpdated,
    #[value(name = "product_deleted")]
    ProductDeleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::ProductAdded,
        EventKind::ProductUpdated,
        EventKind::ProductDeleted,
    ];

    /// Maps an SSE event name to its kind. Older servers pushed `ProductAdded`,
    /// `ReceiveProductUpdate` and `ProductDeleted`, which are still understood.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "product_added" | "ProductAdded" => Some(EventKind::ProductAdded),
            "product_updated" | "ReceiveProductUpdate" => Some(EventKind::ProductUpdated),
            "product_deleted" | "ProductDeleted" => Some(EventKind::ProductDeleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ProductAdded => "product_added",
            EventKind::ProductUpdated => "product_updated",
            EventKind::ProductDeleted => "product_deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductEvent {
    Added(Product),
    Updated(Product),
    Deleted(i32),
}

impl ProductEvent {
    /// Parses an event payload. Current servers send `{"type": .., "data": {..}}`,
    /// older ones pushed the bare product or id.
    pub fn parse(kind: EventKind, payload: &Value) -> Result<Self> {
        let body = payload.get("data").unwrap_or(payload);

        match kind {
            EventKind::ProductAdded | EventKind::ProductUpdated => {
                let product: Product =
                    serde_json::from_value(body.get("product").unwrap_or(body).clone())
                        .with_context(|| format!("Malformed product in {kind} event"))?;
                Ok(if kind == EventKind::ProductAdded {
                    ProductEvent::Added(product)
                } else {
                    ProductEvent::Updated(product)
                })
            }
            EventKind::ProductDeleted => {
                let id = body
                    .get("productId")
                    .unwrap_or(body)
                    .as_i64()
                    .context("product_deleted event without a product id")?;
                Ok(ProductEvent::Deleted(i32::try_from(id)?))
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ProductEvent::Added(_) => EventKind::ProductAdded,
            ProductEvent::Updated(_) => EventKind::ProductUpdated,
            ProductEvent::Deleted(_) => EventKind::ProductDeleted,
        }
    }

    pub fn product_id(&self) -> i32 {
        match self {
            ProductEvent::Added(product) | ProductEvent::Updated(product) => product.id,
            ProductEvent::Deleted(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One client's view of the catalog: a hub connection, the kinds it listens to and the
/// mirror those events are applied to.
pub struct ClientSession {
    pub label: String,
    base_url: String,
    state: SessionState,
    subscriptions: HashSet<EventKind>,
    mirror: ProductMirror,
    connection: Option<Connection>,
}

impl ClientSession {
    /// A disconnected session subscribed to every event kind.
    pub fn new(base_url: &str, label: &str) -> Self {
        Self::with_subscriptions(base_url, label, EventKind::ALL)
    }

    pub fn with_subscriptions(
        base_url: &str,
        label: &str,
        kinds: impl IntoIterator<Item = EventKind>,
    ) -> Self {
        Self {
            label: label.to_string(),
            base_url: base_url.to_string(),
            state: SessionState::Disconnected,
            subscriptions: kinds.into_iter().collect(),
            mirror: ProductMirror::new(),
            connection: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mirror(&self) -> &ProductMirror {
        &self.mirror
    }

    pub fn subscribe(&mut self, kind: EventKind) {
        self.subscriptions.insert(kind);
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Seeds the mirror from `GET /products`. Done once; reconnects do not reload.
    pub async fn load(&mut self, api_client: &ApiClient) -> Result<()> {
        let products = api_client.list_products().await?;
        info!("{}: loaded {} product(s)", self.label, products.len());
        self.mirror.load(products);
        Ok(())
    }

    pub async fn connect(&mut self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            debug!("{}: connect called while {:?}", self.label, self.state);
            return Ok(());
        }

        let connection = Connection::establish(&self.base_url, self.label.clone()).await?;
        self.connection = Some(connection);
        self.state = SessionState::Connecting;
        debug!("{}: connecting to the product hub", self.label);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if self.connection.take().is_some() {
            info!("{}: disconnected", self.label);
        }
        self.state = SessionState::Disconnected;
    }

    /// Applies one transport signal and returns the product event it carried, if that
    /// event was applied to the mirror.
    pub fn handle(&mut self, signal: Signal) -> Option<ProductEvent> {
        match signal {
            Signal::Event(event) => {
                match self.state {
                    SessionState::Disconnected => return None,
                    SessionState::Connecting => {
                        info!("{}: connected", self.label);
                        self.state = SessionState::Connected;
                    }
                    SessionState::Connected => {}
                }

                let Some(kind) = EventKind::from_wire(&event.event_type) else {
                    debug!("{}: ignoring {} event", self.label, event.event_type);
                    return None;
                };

                if !self.is_subscribed(kind) {
                    debug!("{}: not subscribed to {kind}", self.label);
                    return None;
                }

                match ProductEvent::parse(kind, &event.data) {
                    Ok(product_event) => {
                        self.mirror.apply(&product_event);
                        Some(product_event)
                    }
                    Err(e) => {
                        warn!("{}: dropping {kind} event: {e:#}", self.label);
                        None
                    }
                }
            }
            Signal::TransportError(e) => {
                if self.state == SessionState::Connected {
                    warn!("{}: connection lost ({e}), reconnecting", self.label);
                    self.state = SessionState::Connecting;
                }
                None
            }
            Signal::Closed => {
                self.disconnect();
                None
            }
        }
    }

    /// Waits for the next transport signal and applies it.
    pub async fn poll(&mut self) -> Result<Option<ProductEvent>> {
        let connection = self
            .connection
            .as_mut()
            .context("Session is not connected")?;
        let signal = connection.next_signal().await;
        Ok(self.handle(signal))
    }

    pub async fn wait_until_connected(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        while self.state != SessionState::Connected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for {} to connect", self.label);
            }

            match tokio::time::timeout(remaining, self.poll()).await {
                Ok(result) => {
                    result?;
                    if self.state == SessionState::Disconnected {
                        anyhow::bail!("Connection closed before {} connected", self.label);
                    }
                }
                Err(_) => anyhow::bail!("Timeout waiting for {} to connect", self.label),
            }
        }

        Ok(())
    }

    /// Waits for a `kind` event about `product_id`, applying everything received meanwhile.
    pub async fn wait_for(
        &mut self,
        kind: EventKind,
        product_id: i32,
        timeout: Duration,
    ) -> Result<ProductEvent> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for event: {kind} (id {product_id})");
            }

            match tokio::time::timeout(remaining, self.poll()).await {
                Ok(Ok(Some(event))) if event.kind() == kind && event.product_id() == product_id => {
                    return Ok(event);
                }
                Ok(Ok(_)) => {
                    if self.state == SessionState::Disconnected {
                        anyhow::bail!("SSE connection closed");
                    }
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => anyhow::bail!("Timeout waiting for event: {kind} (id {product_id})"),
            }
        }
    }
}

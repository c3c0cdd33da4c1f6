use crate::connection::ConnectionId;
use serde::Serialize;
use serde_json::Value;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Event bodies use camelCase field names, matching the product payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum Event {
    // Products
    #[serde(rename = "product_added")]
    ProductAdded { product: Value },
    #[serde(rename = "product_updated")]
    ProductUpdated { product: Value },
    #[serde(rename = "product_deleted")]
    ProductDeleted { product_id: i32 },

    // System events
    #[serde(rename = "connected")]
    Connected { connection_id: String },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::ProductAdded { .. } => "product_added",
            Event::ProductUpdated { .. } => "product_updated",
            Event::ProductDeleted { .. } => "product_deleted",
            Event::Connected { .. } => "connected",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub event: Event,
    pub scope: MessageScope,
}

#[derive(Debug, Clone)]
pub enum MessageScope {
    /// Send to one specific connection
    Connection { connection_id: ConnectionId },
    /// Send to all connections
    Broadcast,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_events_serialize_with_type_and_data() {
        let event = Event::ProductAdded {
            product: json!({"id": 1, "name": "Widget"}),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "product_added", "data": {"product": {"id": 1, "name": "Widget"}}})
        );
    }

    #[test]
    fn deleted_event_carries_only_the_id() {
        let event = Event::ProductDeleted { product_id: 4 };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "product_deleted", "data": {"productId": 4}})
        );
    }

    #[test]
    fn connected_greeting_uses_camel_case() {
        let event = Event::Connected {
            connection_id: "abc".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "connected", "data": {"connectionId": "abc"}})
        );
    }

    #[test]
    fn event_type_matches_serialized_tag() {
        let events = [
            Event::ProductAdded { product: json!({}) },
            Event::ProductUpdated { product: json!({}) },
            Event::ProductDeleted { product_id: 1 },
            Event::Connected {
                connection_id: "abc".to_string(),
            },
        ];

        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.event_type());
        }
    }
}

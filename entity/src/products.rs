//! Product records held by the in-memory catalog.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::products::Model)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Assigned by the store, never taken from a request body.
    #[serde(skip_deserializing)]
    pub id: Id,

    pub name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub description: String,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializing_a_draft_ignores_server_assigned_fields() {
        let draft: Model = serde_json::from_value(json!({
            "id": 42,
            "name": "Widget",
            "price": 9.99,
            "lastUpdated": "2020-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(draft.id, 0);
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price, 9.99);
        assert_eq!(draft.description, "");
        assert_eq!(draft.last_updated, DateTime::<Utc>::default());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let product = Model {
            id: 7,
            name: "Gadget".to_string(),
            price: 5.0,
            description: "small".to_string(),
            last_updated: Utc::now(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Gadget");
        assert!(value.get("lastUpdated").is_some());
        assert!(value.get("last_updated").is_none());
    }

    #[test]
    fn a_draft_without_a_name_is_rejected() {
        let result = serde_json::from_value::<Model>(json!({ "price": 1.0 }));
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};

/// A product as it appears on the wire. `id` and `lastUpdated` are assigned by the server
/// and ignored when sent back as a draft.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Product {
    pub fn draft(name: &str, price: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            price,
            description: description.to_string(),
            ..Default::default()
        }
    }
}

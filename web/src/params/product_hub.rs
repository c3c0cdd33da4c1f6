use chrono::{DateTime, Utc};
use domain::products::Model;
use serde::Deserialize;
use utoipa::ToSchema;

/// A product as announced by a client through the hub. Unlike a REST draft, the client
/// supplies the id, since the relay does not consult the store.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductParams {
    pub(crate) id: i32,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) price: f64,
    #[serde(default)]
    pub(crate) description: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub(crate) last_updated: Option<DateTime<Utc>>,
}

impl From<ProductParams> for Model {
    fn from(params: ProductParams) -> Self {
        Model {
            id: params.id,
            name: params.name,
            price: params.price,
            description: params.description,
            last_updated: params.last_updated.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeletedParams {
    pub(crate) product_id: i32,
}

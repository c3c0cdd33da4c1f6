//! Client-invoked relays on the product hub.
//!
//! A connected client may ask the server to fan out a product event itself, without
//! going through the REST API. These relays publish the event as given and never touch
//! the store, so whatever they announce may not match the catalog.

use crate::error::Error;
use crate::products::Model;
use crate::Id;
use events::{DomainEvent, EventPublisher};

use log::*;

pub async fn send_product_update(
    event_publisher: &EventPublisher,
    product: Model,
) -> Result<(), Error> {
    debug!("Relaying product update for id={}", product.id);

    event_publisher
        .publish(DomainEvent::ProductUpdated {
            product: serde_json::to_value(&product)?,
        })
        .await;

    Ok(())
}

pub async fn notify_product_added(
    event_publisher: &EventPublisher,
    product: Model,
) -> Result<(), Error> {
    debug!("Relaying product added for id={}", product.id);

    event_publisher
        .publish(DomainEvent::ProductCreated {
            product: serde_json::to_value(&product)?,
        })
        .await;

    Ok(())
}

pub async fn notify_product_deleted(event_publisher: &EventPublisher, product_id: Id) {
    debug!("Relaying product deleted for id={product_id}");

    event_publisher
        .publish(DomainEvent::ProductDeleted { product_id })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingHandler;

    #[tokio::test]
    async fn relays_publish_matching_events() -> Result<(), Error> {
        let (publisher, recorded) = RecordingHandler::publisher();
        let product = Model {
            id: 5,
            name: "Relayed".to_owned(),
            ..Default::default()
        };
        let payload = serde_json::to_value(&product)?;

        notify_product_added(&publisher, product.clone()).await?;
        send_product_update(&publisher, product).await?;
        notify_product_deleted(&publisher, 5).await;

        assert_eq!(
            recorded.events(),
            vec![
                DomainEvent::ProductCreated {
                    product: payload.clone()
                },
                DomainEvent::ProductUpdated { product: payload },
                DomainEvent::ProductDeleted { product_id: 5 },
            ]
        );

        Ok(())
    }
}

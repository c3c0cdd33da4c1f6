//! Catalog operations. Every mutation is applied to the store and its domain event
//! published while the store lock is held, so no other request can observe or mutate
//! the catalog between the change and its broadcast.
//!
//! Event handlers therefore must not call back into the store.

use crate::error::Error;
use crate::products::Model;
use crate::{Id, ProductStore};
use events::{DomainEvent, EventPublisher};

use log::*;

pub async fn find_all(store: &ProductStore) -> Vec<Model> {
    let products = store.lock().await.list();
    info!("GetProducts called - returning {} products", products.len());
    products
}

pub async fn find_by_id(store: &ProductStore, id: Id) -> Result<Model, Error> {
    Ok(store.lock().await.find_by_id(id)?)
}

pub async fn create(
    store: &ProductStore,
    event_publisher: &EventPublisher,
    product_model: Model,
) -> Result<Model, Error> {
    let mut products = store.lock().await;
    let product = products.create(product_model)?;

    info!(
        "Product added: id={}, name={}, price={}",
        product.id, product.name, product.price
    );

    event_publisher
        .publish(DomainEvent::ProductCreated {
            product: serde_json::to_value(&product)?,
        })
        .await;

    Ok(product)
}

pub async fn update(
    store: &ProductStore,
    event_publisher: &EventPublisher,
    id: Id,
    product_model: Model,
) -> Result<Model, Error> {
    let mut products = store.lock().await;
    let product = products.update(id, product_model).map_err(|err| {
        warn!("Update failed: Product with id={id} not found");
        err
    })?;

    info!(
        "Product updated: id={}, name={}, price={}",
        product.id, product.name, product.price
    );

    event_publisher
        .publish(DomainEvent::ProductUpdated {
            product: serde_json::to_value(&product)?,
        })
        .await;

    Ok(product)
}

pub async fn delete(
    store: &ProductStore,
    event_publisher: &EventPublisher,
    id: Id,
) -> Result<Model, Error> {
    let mut products = store.lock().await;
    let product = products.delete(id).map_err(|err| {
        warn!("Delete failed: Product with id={id} not found");
        err
    })?;

    info!("Product deleted: id={}, name={}", product.id, product.name);

    event_publisher
        .publish(DomainEvent::ProductDeleted {
            product_id: product.id,
        })
        .await;

    Ok(product)
}

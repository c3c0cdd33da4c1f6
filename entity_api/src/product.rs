use super::error::{EntityApiErrorKind, Error};
use entity::{products::Model, Id};
use tokio::sync::{Mutex, MutexGuard};

use log::*;

/// Sole owner of the in-memory product catalog.
///
/// Access goes through [`ProductStore::lock`], which hands out exclusive access to the
/// underlying [`Products`]. Callers that need a mutation and its follow-up work (e.g.
/// publishing a domain event) to happen as one unit simply hold the guard across both.
pub struct ProductStore {
    products: Mutex<Products>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(Products::new()),
        }
    }

    /// Waits for exclusive access to the catalog.
    pub async fn lock(&self) -> MutexGuard<'_, Products> {
        self.products.lock().await
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog itself: records in insertion order plus the id sequence.
#[derive(Debug)]
pub struct Products {
    records: Vec<Model>,
    // Never derived from records.len(), so ids are not reused after a delete
    next_id: Id,
}

impl Products {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn list(&self) -> Vec<Model> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_id(&self, id: Id) -> Result<Model, Error> {
        self.records
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    pub fn create(&mut self, product_model: Model) -> Result<Model, Error> {
        debug!("New Product Model to be inserted: {product_model:?}");

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(Error {
            id: None,
            error_kind: EntityApiErrorKind::IdSequenceExhausted,
        })?;

        let product = Model {
            id,
            name: product_model.name,
            price: product_model.price,
            description: product_model.description,
            last_updated: chrono::Utc::now(),
        };

        self.records.push(product.clone());

        Ok(product)
    }

    pub fn update(&mut self, id: Id, model: Model) -> Result<Model, Error> {
        match self.records.iter_mut().find(|product| product.id == id) {
            Some(product) => {
                debug!("Existing Product model to be Updated: {product:?}");

                product.name = model.name;
                product.price = model.price;
                product.description = model.description;
                product.last_updated = chrono::Utc::now();

                Ok(product.clone())
            }
            None => {
                error!("Product with id {id} not found");

                Err(Error::not_found(id))
            }
        }
    }

    pub fn delete(&mut self, id: Id) -> Result<Model, Error> {
        match self.records.iter().position(|product| product.id == id) {
            Some(index) => Ok(self.records.remove(index)),
            None => {
                error!("Product with id {id} not found");

                Err(Error::not_found(id))
            }
        }
    }
}

impl Default for Products {
    fn default() -> Self {
        Self::new()
    }
}

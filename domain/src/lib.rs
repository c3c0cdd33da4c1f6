//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. The `web` layer talks to the catalog only through
//! the operations defined here, which pair every mutation with its domain event.
pub use entity_api::{product::ProductStore, products, Id};

pub mod error;
pub mod product;
pub mod product_hub;

#[cfg(test)]
pub(crate) mod test_helpers;

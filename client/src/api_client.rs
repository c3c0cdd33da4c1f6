use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::product::Product;

/// Outcome of a PUT or DELETE against a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/products", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to list products")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to list products: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse product list")
    }

    pub async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to get product")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(
                response.json().await.context("Failed to parse product")?,
            )),
            status => anyhow::bail!("Failed to get product {}: {}", id, status),
        }
    }

    pub async fn create_product(&self, draft: &Product) -> Result<Product> {
        let url = format!("{}/products", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .context("Failed to create product")?;

        if response.status() != StatusCode::CREATED {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            anyhow::bail!("Failed to create product: {} - Response: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse created product")
    }

    pub async fn update_product(&self, id: i32, draft: &Product) -> Result<Mutation> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .context("Failed to update product")?;

        Self::mutation_outcome("update", response.status())
    }

    pub async fn delete_product(&self, id: i32) -> Result<Mutation> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to delete product")?;

        Self::mutation_outcome("delete", response.status())
    }

    pub async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach health endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Health check failed: {}", response.status());
        }

        response.json().await.context("Failed to parse health status")
    }

    fn mutation_outcome(action: &str, status: StatusCode) -> Result<Mutation> {
        match status {
            StatusCode::NO_CONTENT => Ok(Mutation::Applied),
            StatusCode::NOT_FOUND => Ok(Mutation::NotFound),
            status => anyhow::bail!("Failed to {} product: {}", action, status),
        }
    }
}

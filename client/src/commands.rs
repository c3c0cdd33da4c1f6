use anyhow::Result;
use clap::Subcommand;

use crate::api_client::{ApiClient, Mutation};
use crate::product::Product;

/// One-shot catalog requests issued from the command line.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ProductCommand {
    /// Fetch a single product
    Get { id: i32 },
    /// Create a product and print the record the server assigned
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Replace a product's fields. Omitted fields are reset to their defaults.
    Update {
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a product
    Delete { id: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found(Product),
    Created(Product),
    Updated(i32),
    Deleted(i32),
    NotFound(i32),
}

impl ProductCommand {
    pub async fn run(self, api_client: &ApiClient) -> Result<Outcome> {
        match self {
            ProductCommand::Get { id } => Ok(match api_client.find_product(id).await? {
                Some(product) => Outcome::Found(product),
                None => Outcome::NotFound(id),
            }),
            ProductCommand::Add {
                name,
                price,
                description,
            } => {
                let created = api_client
                    .create_product(&Product::draft(&name, price, &description))
                    .await?;
                Ok(Outcome::Created(created))
            }
            ProductCommand::Update {
                id,
                name,
                price,
                description,
            } => {
                let draft = Product::draft(&name, price, &description);
                Ok(match api_client.update_product(id, &draft).await? {
                    Mutation::Applied => Outcome::Updated(id),
                    Mutation::NotFound => Outcome::NotFound(id),
                })
            }
            ProductCommand::Delete { id } => Ok(match api_client.delete_product(id).await? {
                Mutation::Applied => Outcome::Deleted(id),
                Mutation::NotFound => Outcome::NotFound(id),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Client;
    use serde_json::json;

    fn api_client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(Client::new(), server.url())
    }

    #[tokio::test]
    async fn get_reports_found_and_missing_products() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/1")
            .with_status(200)
            .with_body(json!({"id": 1, "name": "Widget", "price": 9.99, "description": ""}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/products/2")
            .with_status(404)
            .create_async()
            .await;
        let client = api_client(&server);

        let found = ProductCommand::Get { id: 1 }.run(&client).await.unwrap();
        let Outcome::Found(product) = found else {
            panic!("expected a product, got {found:?}");
        };
        assert_eq!(product.name, "Widget");

        assert_eq!(
            ProductCommand::Get { id: 2 }.run(&client).await.unwrap(),
            Outcome::NotFound(2)
        );
    }

    #[tokio::test]
    async fn add_posts_the_draft() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/products")
            .match_body(Matcher::Json(
                json!({"id": 0, "name": "Gadget", "price": 5.0, "description": "small"}),
            ))
            .with_status(201)
            .with_body(json!({"id": 3, "name": "Gadget", "price": 5.0, "description": "small"}).to_string())
            .create_async()
            .await;

        let outcome = ProductCommand::Add {
            name: "Gadget".to_string(),
            price: 5.0,
            description: "small".to_string(),
        }
        .run(&api_client(&server))
        .await
        .unwrap();

        mock.assert_async().await;
        assert!(matches!(outcome, Outcome::Created(product) if product.id == 3));
    }

    #[tokio::test]
    async fn update_and_delete_report_unknown_ids() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/products/1")
            .match_body(Matcher::PartialJson(json!({"name": "Gizmo", "price": 0.0})))
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("DELETE", "/products/9")
            .with_status(404)
            .create_async()
            .await;
        let client = api_client(&server);

        let update = ProductCommand::Update {
            id: 1,
            name: "Gizmo".to_string(),
            price: 0.0,
            description: String::new(),
        };
        assert_eq!(update.run(&client).await.unwrap(), Outcome::Updated(1));
        assert_eq!(
            ProductCommand::Delete { id: 9 }.run(&client).await.unwrap(),
            Outcome::NotFound(9)
        );
    }
}

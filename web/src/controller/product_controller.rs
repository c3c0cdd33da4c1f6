use crate::{AppState, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::product as ProductApi;
use domain::{products::Model, Id};

use log::*;

/// GET all Products in insertion order
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Successfully retrieved all Products", body = [Model]),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("GET all Products");

    let products = ProductApi::find_all(app_state.product_store_ref()).await;

    Json(products)
}

/// GET a particular Product specified by its id.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Product by its id", body = Model),
        (status = 404, description = "Product not found"),
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    debug!("GET Product by id: {id}");

    let product = ProductApi::find_by_id(app_state.product_store_ref(), id).await?;

    Ok(Json(product))
}

/// POST create a new Product and notify every connected client
#[utoipa::path(
    post,
    path = "/products",
    request_body = Model,
    responses(
        (status = 201, description = "Successfully Created a New Product", body = Model),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(product_model): Json<Model>,
) -> Result<impl IntoResponse> {
    debug!("POST Create a New Product from: {product_model:?}");

    let product = ProductApi::create(
        app_state.product_store_ref(),
        app_state.event_publisher.as_ref(),
        product_model,
    )
    .await?;

    debug!("New Product: {product:?}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/products/{}", product.id))],
        Json(product),
    ))
}

/// PUT replace the name, price and description of a Product
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Id of Product to update"),
    ),
    request_body = Model,
    responses(
        (status = 204, description = "Successfully Updated Product"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(product_model): Json<Model>,
) -> Result<impl IntoResponse> {
    debug!("PUT Update Product with id: {id}");

    let product = ProductApi::update(
        app_state.product_store_ref(),
        app_state.event_publisher.as_ref(),
        id,
        product_model,
    )
    .await?;

    debug!("Updated Product: {product:?}");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE a Product specified by its id
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Id of Product to delete"),
    ),
    responses(
        (status = 204, description = "Successfully Deleted Product"),
        (status = 404, description = "Product not found"),
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    debug!("DELETE Product by id: {id}");

    ProductApi::delete(
        app_state.product_store_ref(),
        app_state.event_publisher.as_ref(),
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

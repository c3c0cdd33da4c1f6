//! Hub invocations: a connected client asks the server to broadcast a product event
//! directly. Nothing here reads or writes the catalog.

use crate::params::product_hub::{DeletedParams, ProductParams};
use crate::{AppState, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::product_hub as ProductHubApi;

use log::*;

#[utoipa::path(
    post,
    path = "/product_hub/send_product_update",
    request_body = ProductParams,
    responses(
        (status = 204, description = "product_updated broadcast to every connection"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn send_product_update(
    State(app_state): State<AppState>,
    Json(params): Json<ProductParams>,
) -> Result<impl IntoResponse> {
    debug!("POST hub SendProductUpdate: {params:?}");

    ProductHubApi::send_product_update(app_state.event_publisher.as_ref(), params.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/product_hub/notify_product_added",
    request_body = ProductParams,
    responses(
        (status = 204, description = "product_added broadcast to every connection"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn notify_product_added(
    State(app_state): State<AppState>,
    Json(params): Json<ProductParams>,
) -> Result<impl IntoResponse> {
    debug!("POST hub NotifyProductAdded: {params:?}");

    ProductHubApi::notify_product_added(app_state.event_publisher.as_ref(), params.into())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/product_hub/notify_product_deleted",
    request_body = DeletedParams,
    responses(
        (status = 204, description = "product_deleted broadcast to every connection"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn notify_product_deleted(
    State(app_state): State<AppState>,
    Json(params): Json<DeletedParams>,
) -> impl IntoResponse {
    debug!("POST hub NotifyProductDeleted: {params:?}");

    ProductHubApi::notify_product_deleted(app_state.event_publisher.as_ref(), params.product_id)
        .await;

    StatusCode::NO_CONTENT
}

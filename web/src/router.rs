use crate::{controller::health_check_controller, params, sse, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use crate::controller::{product_controller, product_hub_controller};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Product Updates API"
        ),
        paths(
            health_check_controller::health_check,
            product_controller::index,
            product_controller::read,
            product_controller::create,
            product_controller::update,
            product_controller::delete,
            product_hub_controller::send_product_update,
            product_hub_controller::notify_product_added,
            product_hub_controller::notify_product_deleted,
            sse::handler::sse_handler,
        ),
        components(
            schemas(
                domain::products::Model,
                params::product_hub::ProductParams,
                params::product_hub::DeletedParams,
                health_check_controller::HealthStatus,
            )
        ),
        tags(
            (name = "product_updates", description = "Real-time Product Catalog API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(product_routes(app_state.clone()))
        .merge(product_hub_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn product_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/products",
            get(product_controller::index).post(product_controller::create),
        )
        .route(
            "/products/{id}",
            get(product_controller::read)
                .put(product_controller::update)
                .delete(product_controller::delete),
        )
        .with_state(app_state)
}

/// The SSE stream plus the hub invocations clients can use to broadcast directly
fn product_hub_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/product_hub", get(sse::handler::sse_handler))
        .route(
            "/product_hub/send_product_update",
            post(product_hub_controller::send_product_update),
        )
        .route(
            "/product_hub/notify_product_added",
            post(product_hub_controller::notify_product_added),
        )
        .route(
            "/product_hub/notify_product_deleted",
            post(product_hub_controller::notify_product_deleted),
        )
        .with_state(app_state)
}

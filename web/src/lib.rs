use axum::Router;
use log::*;
use tokio::net::TcpListener;

pub use self::error::{Error, Result};
pub use service::AppState;

mod controller;
pub(crate) mod cors;
mod error;
pub(crate) mod params;
pub mod router;
pub(crate) mod sse;

/// The full application: every route with the CORS policy applied on top.
pub fn app(app_state: AppState) -> Router {
    let cors = cors::cors_layer(&app_state.config);
    router::define_routes(app_state).layer(cors)
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );

    let listener = TcpListener::bind(&server_url).await?;

    info!("Server listening on http://{}", listener.local_addr()?);
    info!("RapiDoc UI available at http://{server_url}/rapidoc");

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
        return;
    }
    info!("Shutdown signal received, stopping server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use clap::Parser;
    use service::config::Config;
    use tower::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/products")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_allows_listed_origin_with_credentials() {
        let app = app(AppState::new(Config::parse_from([
            "product_updates_rs",
            "--allowed-origins",
            "http://localhost:4200",
        ])));

        let response = app.oneshot(preflight("http://localhost:4200")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:4200"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    }

    #[tokio::test]
    async fn cors_omits_headers_for_unlisted_origin() {
        let app = app(AppState::new(Config::parse_from([
            "product_updates_rs",
            "--allowed-origins",
            "http://localhost:4200",
        ])));

        let response = app.oneshot(preflight("https://elsewhere.example")).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn production_cors_allows_hosting_platform_origin() {
        let app = app(AppState::new(Config::parse_from([
            "product_updates_rs",
            "--runtime-env",
            "production",
        ])));
        let origin = "https://client.gentle-sky-42.eastus.azurecontainerapps.io";

        let response = app.oneshot(preflight(origin)).await.unwrap();

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
    }
}

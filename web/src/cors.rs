use axum::http::HeaderValue;
use log::*;
use service::config::Config;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Builds the CORS policy for the configured runtime.
///
/// Outside of production only the exact `allowed_origins` list is accepted. In production
/// any localhost origin and any origin under `allowed_origin_suffix` are accepted as well.
/// Credentials are allowed, so methods and headers mirror the request instead of using `*`.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.is_production() {
        let allowed_origins = config.allowed_origins.clone();
        let suffix = config.allowed_origin_suffix.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| is_allowed_in_production(origin, &allowed_origins, &suffix))
                .unwrap_or(false)
        })
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!("Ignoring invalid CORS origin: {origin}"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub(crate) fn is_allowed_in_production(origin: &str, allowed_origins: &[String], suffix: &str) -> bool {
    if origin.starts_with("http://localhost") || origin.starts_with("https://localhost") {
        return true;
    }

    if !suffix.is_empty() && origin.ends_with(suffix) {
        return true;
    }

    allowed_origins.iter().any(|allowed| allowed == origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = ".azurecontainerapps.io";

    #[test]
    fn production_allows_any_localhost_origin() {
        assert!(is_allowed_in_production("http://localhost:9999", &[], SUFFIX));
        assert!(is_allowed_in_production("https://localhost", &[], SUFFIX));
    }

    #[test]
    fn production_allows_hosting_platform_domains() {
        assert!(is_allowed_in_production(
            "https://client.happy-hill-1234.eastus.azurecontainerapps.io",
            &[],
            SUFFIX
        ));
        assert!(!is_allowed_in_production(
            "https://azurecontainerapps.io.evil.example",
            &[],
            SUFFIX
        ));
    }

    #[test]
    fn production_allows_configured_origins_exactly() {
        let allowed = vec!["https://shop.example".to_string()];

        assert!(is_allowed_in_production("https://shop.example", &allowed, SUFFIX));
        assert!(!is_allowed_in_production("https://shop.example.org", &allowed, SUFFIX));
    }

    #[test]
    fn empty_suffix_does_not_admit_everything() {
        assert!(!is_allowed_in_production("https://any.example", &[], ""));
    }
}

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Subscription URLs are fetched by native clients, browsers, and the
/// converter alike; the surface is read-only and token-gated, so CORS stays
/// permissive.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600))
}

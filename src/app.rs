use crate::config::SessionLayer;
use crate::handlers::{api_handler, health};
use crate::middleware::add_security_headers;
use crate::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Assembles the `/api` action router, the health check and the static file fallback.
pub fn build_router(state: AppState, session_layer: SessionLayer, static_dir: &str) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route(
            "/api",
            get(api_handler)
                .post(api_handler)
                .put(api_handler)
                .delete(api_handler),
        )
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

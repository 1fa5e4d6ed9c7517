//! HTTP API server for the shop backend.
//!
//! Provides REST endpoints for users (full CRUD) and read access to
//! products and orders, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use domain::ShopRepository;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ShopRepository>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/users",
            get(routes::users::find_all::<S>).post(routes::users::insert::<S>),
        )
        .route(
            "/users/{id}",
            get(routes::users::find_by_id::<S>)
                .put(routes::users::update::<S>)
                .delete(routes::users::delete::<S>),
        )
        .route("/products", get(routes::products::find_all::<S>))
        .route("/products/{id}", get(routes::products::find_by_id::<S>))
        .route("/orders", get(routes::orders::find_all::<S>))
        .route("/orders/{id}", get(routes::orders::find_by_id::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(middleware::from_fn(error::attach_request_path))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given store.
pub fn create_default_state<S: ShopRepository>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}

//! HTTP API server for the shopping cart.
//!
//! Exposes the add-product-to-cart use case behind bearer token
//! authentication, with structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use checkout::{
    AddProductToCart, AddProductToCartUseCase, InMemoryCartRepository, InMemoryCustomerGateway,
    InMemoryProductGateway,
};
use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use store::{PostgresCartRepository, PostgresCustomerGateway, PostgresProductGateway};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub add_product_to_cart: Arc<dyn AddProductToCartUseCase>,
    pub auth_secret: String,
    /// Pinged by the health check when present.
    pub database: Option<PgPool>,
}

/// Handles to the in-memory adapters behind a state built by
/// [`create_in_memory_state`], for seeding and inspection.
#[derive(Clone, Default)]
pub struct InMemoryAdapters {
    pub customers: InMemoryCustomerGateway,
    pub products: InMemoryProductGateway,
    pub carts: InMemoryCartRepository,
}

impl InMemoryAdapters {
    /// Registers the configured customers and loads the configured products.
    pub async fn seed(&self, config: &Config) {
        for customer_id in &config.seed_customers {
            self.customers.register(*customer_id).await;
        }
        for product in &config.seed_products {
            self.products.insert(*product).await;
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    let cart_router = Router::new()
        .route(
            "/add-product-to-cart",
            post(routes::cart::add_product_to_cart),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_customer,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(cart_router)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by PostgreSQL.
pub fn create_postgres_state(pool: PgPool, auth_secret: impl Into<String>) -> Arc<AppState> {
    let use_case = AddProductToCart::new(
        PostgresCustomerGateway::new(pool.clone()),
        PostgresProductGateway::new(pool.clone()),
        PostgresCartRepository::new(pool.clone()),
    );

    Arc::new(AppState {
        add_product_to_cart: Arc::new(use_case),
        auth_secret: auth_secret.into(),
        database: Some(pool),
    })
}

/// Creates application state backed by in-memory adapters.
pub fn create_in_memory_state(auth_secret: impl Into<String>) -> (Arc<AppState>, InMemoryAdapters) {
    let adapters = InMemoryAdapters::default();
    let use_case = AddProductToCart::new(
        adapters.customers.clone(),
        adapters.products.clone(),
        adapters.carts.clone(),
    );

    let state = Arc::new(AppState {
        add_product_to_cart: Arc::new(use_case),
        auth_secret: auth_secret.into(),
        database: None,
    });

    (state, adapters)
}

/// Creates in-memory application state seeded from `config`.
pub async fn create_seeded_in_memory_state(config: &Config) -> (Arc<AppState>, InMemoryAdapters) {
    let (state, adapters) = create_in_memory_state(config.auth_access_token.clone());
    adapters.seed(config).await;

    tracing::info!(
        customers = config.seed_customers.len(),
        products = config.seed_products.len(),
        "seeded in-memory adapters"
    );
    if config.seed_customers.is_empty() || config.seed_products.is_empty() {
        tracing::warn!(
            "SEED_CUSTOMER_IDS or SEED_PRODUCTS is empty; add-product-to-cart requests will be rejected"
        );
    }

    (state, adapters)
}

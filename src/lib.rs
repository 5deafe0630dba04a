pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use error::ErrorResponse;
use handlers::{
    AppliedRuleResponse, CartCalculationResponse, CartLineInput, CartLineResponse, HealthResponse,
};
use models::{PricingRuleRecord, Product};
use pricing::{CartPricingService, MetricsSummary, PerformanceMetrics, RuleConfigurationStore};
use store::PricingStore;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::calculate_cart,
        handlers::list_products,
        handlers::get_product,
        handlers::list_pricing_rules,
        handlers::get_pricing_rule,
        handlers::health_check,
        handlers::get_metrics,
    ),
    components(
        schemas(
            Product,
            PricingRuleRecord,
            CartLineInput,
            CartLineResponse,
            AppliedRuleResponse,
            CartCalculationResponse,
            HealthResponse,
            MetricsSummary,
            ErrorResponse
        )
    ),
    tags(
        (name = "pricing", description = "Cart pricing and pricing rules"),
        (name = "catalog", description = "Product catalog"),
        (name = "system", description = "Health and metrics")
    ),
    info(
        title = "Cart Pricing API",
        version = "1.0.0",
        description = "Prices shopping carts by applying prioritized discount rules"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PricingStore>,
    pub pricing: Arc<CartPricingService>,
    pub metrics: PerformanceMetrics,
}

impl AppState {
    /// Wire the rule cache and pricing service over a store
    pub fn new(store: Arc<dyn PricingStore>, rule_cache_ttl: Duration) -> Self {
        let metrics = PerformanceMetrics::new();
        let rule_store = Arc::new(RuleConfigurationStore::with_ttl(
            store.clone(),
            metrics.clone(),
            rule_cache_ttl,
        ));
        let pricing = Arc::new(CartPricingService::new(
            store.clone(),
            rule_store,
            metrics.clone(),
        ));

        Self {
            store,
            pricing,
            metrics,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and request tracing
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/api/calculate-cart", post(handlers::calculate_cart))
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/:id", get(handlers::get_product))
        .route("/api/pricing-rules", get(handlers::list_pricing_rules))
        .route("/api/pricing-rules/:id", get(handlers::get_pricing_rule))
        .route("/api/health", get(handlers::health_check))
        .route("/api/metrics", get(handlers::get_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

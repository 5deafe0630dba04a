// HTTP handlers for the cart pricing endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ApiError, ErrorResponse};
use crate::models::{PricingRuleRecord, Product};
use crate::pricing::{
    AppliedRuleRecord, CalculationResult, CartLineRequest, LineItemDetail, MetricsSummary,
    PricingError,
};
use crate::AppState;

/// One line of the cart to price
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CartLineInput {
    #[validate(range(min = 1, message = "product_id must be positive"))]
    #[schema(example = 1)]
    pub product_id: i64,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[schema(example = 3)]
    pub quantity: u32,
}

/// Request body for POST /api/calculate-cart: a bare JSON array of lines
#[derive(Debug, Deserialize, Validate)]
#[serde(transparent)]
pub struct CalculateCartRequest {
    #[validate]
    pub items: Vec<CartLineInput>,
}

impl CalculateCartRequest {
    fn to_cart(&self) -> Vec<CartLineRequest> {
        self.items
            .iter()
            .map(|line| CartLineRequest {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect()
    }
}

/// Round a money amount for the response
fn money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Priced cart line
#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.0)]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30.0)]
    pub total_price: Decimal,
}

impl From<LineItemDetail> for CartLineResponse {
    fn from(item: LineItemDetail) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: money(item.unit_price),
            total_price: money(item.line_total),
        }
    }
}

/// A rule that reduced the total
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedRuleResponse {
    pub rule_name: String,
    #[schema(example = "percentage_discount")]
    pub rule_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 3.0)]
    pub discount_amount: Decimal,
}

impl From<AppliedRuleRecord> for AppliedRuleResponse {
    fn from(record: AppliedRuleRecord) -> Self {
        Self {
            rule_name: record.rule_name,
            rule_type: record.rule_type,
            discount_amount: money(record.discount_amount),
        }
    }
}

/// Response DTO for a cart calculation
///
/// Amounts are JSON numbers rounded to two decimal places. `total_discount` is
/// the difference of the rounded totals, and the applied rule amounts always
/// add up to it.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartCalculationResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30.0)]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 27.0)]
    pub final_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 3.0)]
    pub total_discount: Decimal,
    pub items: Vec<CartLineResponse>,
    pub applied_rules: Vec<AppliedRuleResponse>,
}

impl From<CalculationResult> for CartCalculationResponse {
    fn from(result: CalculationResult) -> Self {
        let base_total = money(result.base_total);
        let final_total = money(result.final_total);
        Self {
            base_total,
            final_total,
            total_discount: base_total - final_total,
            items: result.items.into_iter().map(Into::into).collect(),
            applied_rules: reconcile_applied_rules(result.applied_rules, base_total - final_total),
        }
    }
}

/// Round each applied discount, then spread the rounding remainder a cent at a
/// time, largest discount first, so the amounts sum to `total_discount`
fn reconcile_applied_rules(
    records: Vec<AppliedRuleRecord>,
    total_discount: Decimal,
) -> Vec<AppliedRuleResponse> {
    let cent = Decimal::new(1, 2);
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[b].discount_amount.cmp(&records[a].discount_amount));

    let mut applied: Vec<AppliedRuleResponse> = records.into_iter().map(Into::into).collect();
    let rounded_sum: Decimal = applied.iter().map(|rule| rule.discount_amount).sum();
    let mut remainder = total_discount - rounded_sum;

    // Both sides are whole cents, and a negative remainder implies some amount is at least a cent
    for &index in order.iter().cycle() {
        if remainder.is_zero() {
            break;
        }
        let amount = &mut applied[index].discount_amount;
        if remainder > Decimal::ZERO {
            *amount += cent;
            remainder -= cent;
        } else if *amount >= cent {
            *amount -= cent;
            remainder += cent;
        }
    }

    applied
}

/// Response DTO for GET /api/health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "connected")]
    pub database: String,
}

/// Handler for POST /api/calculate-cart
/// Prices a cart against the active pricing rules
#[utoipa::path(
    post,
    path = "/api/calculate-cart",
    request_body = Vec<CartLineInput>,
    responses(
        (status = 200, description = "Cart priced", body = CartCalculationResponse),
        (status = 400, description = "Invalid or malformed cart", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn calculate_cart(
    State(state): State<AppState>,
    payload: Result<Json<CalculateCartRequest>, JsonRejection>,
) -> Result<Json<CartCalculationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    tracing::debug!("Calculating cart with {} line(s)", request.items.len());

    let result = state.pricing.calculate_cart(&request.to_cart()).await?;

    Ok(Json(result.into()))
}

/// Handler for GET /api/products
/// Lists every product in the catalog
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List of all products", body = Vec<Product>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    tracing::debug!("Fetching all products");

    let products = state.store.list_products().await?;

    tracing::debug!("Retrieved {} products", products.len());
    Ok(Json(products))
}

/// Handler for GET /api/products/:id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    tracing::debug!("Fetching product with id: {}", id);

    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or(PricingError::ProductNotFound(id))?;

    Ok(Json(product))
}

/// Handler for GET /api/pricing-rules
/// Lists active rules in the order they are applied
#[utoipa::path(
    get,
    path = "/api/pricing-rules",
    responses(
        (status = 200, description = "Active pricing rules", body = Vec<PricingRuleRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn list_pricing_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<PricingRuleRecord>>, ApiError> {
    let rules = state.store.list_active_rules().await?;

    tracing::debug!("Retrieved {} active pricing rules", rules.len());
    Ok(Json(rules))
}

/// Handler for GET /api/pricing-rules/:id
#[utoipa::path(
    get,
    path = "/api/pricing-rules/{id}",
    params(
        ("id" = i64, Path, description = "Pricing rule ID")
    ),
    responses(
        (status = 200, description = "Pricing rule found", body = PricingRuleRecord),
        (status = 404, description = "Pricing rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn get_pricing_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PricingRuleRecord>, ApiError> {
    tracing::debug!("Fetching pricing rule with id: {}", id);

    let rule = state
        .store
        .find_rule(id)
        .await?
        .ok_or(PricingError::RuleNotFound(id))?;

    Ok(Json(rule))
}

/// Handler for GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    database: "disconnected".to_string(),
                }),
            )
        }
    }
}

/// Handler for GET /api/metrics
#[utoipa::path(
    get,
    path = "/api/metrics",
    responses(
        (status = 200, description = "Pricing and rule cache counters", body = MetricsSummary)
    ),
    tag = "system"
)]
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSummary> {
    Json(state.metrics.summary())
}

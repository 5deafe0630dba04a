// Error types for the pricing subsystem
// The engine itself never fails; these cover the store and lookups around it

use thiserror::Error;

/// Main error type for pricing store and lookup operations
#[derive(Debug, Error)]
pub enum PricingError {
    /// Database operation errors
    /// Automatically converted from sqlx::Error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Product not found in the catalog
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Pricing rule not found
    #[error("Pricing rule not found: {0}")]
    RuleNotFound(i64),
}

/// Result type alias for pricing operations
///
/// Instead of writing `Result<T, PricingError>`, you can write `PricingResult<T>`.
pub type PricingResult<T> = Result<T, PricingError>;

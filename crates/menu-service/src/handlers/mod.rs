//! HTTP handlers for the menu service.

pub mod drinks;
pub mod health;

pub use drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink};
pub use health::health_check;

use crate::errors::ApiError;

/// Fallback handler for unmatched routes.
///
/// Keeps 404 responses in the same JSON envelope as every other error.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

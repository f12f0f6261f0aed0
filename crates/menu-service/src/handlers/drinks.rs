//! Drink menu handlers.
//!
//! - `GET /drinks` - public menu, recipes in summary form
//! - `GET /drinks-detail` - full recipes, requires `get:drinks-detail`
//! - `POST /drinks` - create a drink, requires `post:drinks`
//! - `PATCH /drinks/:id` - update a drink, requires `patch:drinks`
//! - `DELETE /drinks/:id` - delete a drink, requires `delete:drinks`
//!
//! Protected handlers take the verified [`Claims`] from request
//! extensions, where the authorization middleware stored them.

use crate::auth::Claims;
use crate::errors::ApiError;
use crate::models::{
    CreateDrinkRequest, DeleteResponse, DrinksResponse, MenuResponse, UpdateDrinkRequest,
};
use crate::repositories::DrinksRepository;
use crate::routes::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use std::sync::Arc;
use tracing::instrument;

/// List the menu in public summary form.
///
/// # Errors
///
/// Returns `ApiError::Database` when the query fails.
#[instrument(skip_all, name = "menu.drinks.list")]
pub async fn list_drinks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MenuResponse>, ApiError> {
    let drinks = DrinksRepository::list(&state.pool).await?;

    Ok(Json(MenuResponse {
        success: true,
        drinks: drinks.into_iter().map(|drink| drink.into_summary()).collect(),
    }))
}

/// List the menu with full recipes.
///
/// # Errors
///
/// Returns `ApiError::Database` when the query fails.
#[instrument(skip_all, name = "menu.drinks.list_detail")]
pub async fn list_drinks_detail(
    State(state): State<Arc<AppState>>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<DrinksResponse>, ApiError> {
    let drinks = DrinksRepository::list(&state.pool).await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// Create a new drink.
///
/// # Errors
///
/// - `ApiError::Unprocessable` when the body is malformed, fails
///   validation, or the title already exists
/// - `ApiError::Database` when the insert fails
#[instrument(skip_all, name = "menu.drinks.create")]
pub async fn create_drink(
    State(state): State<Arc<AppState>>,
    Extension(_claims): Extension<Claims>,
    body: Bytes,
) -> Result<Json<DrinksResponse>, ApiError> {
    // Deserialize manually so malformed bodies produce the 422 envelope
    // instead of Axum's default rejection
    let request: CreateDrinkRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(target: "menu.drinks", error = %err, "Rejected malformed create body");
        ApiError::Unprocessable
    })?;

    request.validate().map_err(|reason| {
        tracing::debug!(target: "menu.drinks", reason = %reason, "Rejected invalid drink");
        ApiError::Unprocessable
    })?;

    let drink = DrinksRepository::insert(&state.pool, request.title.trim(), &request.recipe).await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// Update an existing drink. Fields absent from the body are kept.
///
/// # Errors
///
/// - `ApiError::NotFound` when the id is non-numeric or unknown
/// - `ApiError::Unprocessable` when the body is malformed, fails
///   validation, or the new title already exists
/// - `ApiError::Database` when the update fails
#[instrument(skip_all, name = "menu.drinks.update")]
pub async fn update_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(_claims): Extension<Claims>,
    body: Bytes,
) -> Result<Json<DrinksResponse>, ApiError> {
    let id = parse_drink_id(&id)?;

    // Deserialize request body manually to control the error response
    let request: UpdateDrinkRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(target: "menu.drinks", error = %err, "Rejected malformed update body");
        ApiError::Unprocessable
    })?;

    request.validate().map_err(|reason| {
        tracing::debug!(target: "menu.drinks", reason = %reason, "Rejected invalid update");
        ApiError::Unprocessable
    })?;

    let title = request.title.as_deref().map(str::trim);
    let drink =
        DrinksRepository::update(&state.pool, id, title, request.recipe.as_deref()).await?;

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

/// Delete a drink.
///
/// # Errors
///
/// - `ApiError::NotFound` when the id is non-numeric or unknown
/// - `ApiError::Database` when the delete fails
#[instrument(skip_all, name = "menu.drinks.delete")]
pub async fn delete_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_drink_id(&id)?;

    DrinksRepository::delete(&state.pool, id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}

/// Parse a path segment as a drink id.
///
/// Non-numeric segments resolve to 404 rather than a parse error.
fn parse_drink_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drink_id_numeric() {
        assert_eq!(parse_drink_id("42").unwrap(), 42);
    }

    #[test]
    fn test_parse_drink_id_rejects_text() {
        let err = parse_drink_id("abc").expect_err("Expected error");
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn test_parse_drink_id_rejects_trailing_text() {
        let err = parse_drink_id("42abc").expect_err("Expected error");
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn test_parse_drink_id_negative() {
        // Negative ids parse; they simply match no row
        assert_eq!(parse_drink_id("-1").unwrap(), -1);
    }
}

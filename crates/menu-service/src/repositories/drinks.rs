//! Drinks repository.
//!
//! Recipes are stored as JSON text in the `recipe` column and decoded
//! on the way out. A unique index on `title` backs duplicate detection;
//! the resulting constraint violation surfaces as an unprocessable
//! error rather than a server fault.

use crate::errors::ApiError;
use crate::models::{Drink, DrinkRow, Ingredient};
use sqlx::SqlitePool;
use tracing::instrument;

/// Repository for drink persistence operations.
pub struct DrinksRepository;

impl DrinksRepository {
    /// List all drinks in id order.
    #[instrument(skip_all, name = "menu.repo.list_drinks")]
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Drink>, ApiError> {
        let rows: Vec<DrinkRow> =
            sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id")
                .fetch_all(pool)
                .await?;

        rows.into_iter().map(decode_row).collect()
    }

    /// Insert a new drink and return the stored representation.
    #[instrument(skip_all, name = "menu.repo.insert_drink")]
    pub async fn insert(
        pool: &SqlitePool,
        title: &str,
        recipe: &[Ingredient],
    ) -> Result<Drink, ApiError> {
        let encoded = encode_recipe(recipe)?;

        let row: DrinkRow = sqlx::query_as(
            "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(encoded)
        .fetch_one(pool)
        .await
        .map_err(map_constraint_violation)?;

        decode_row(row)
    }

    /// Update a drink, keeping any field not supplied.
    ///
    /// Returns `ApiError::NotFound` when no drink has the given id.
    #[instrument(skip_all, name = "menu.repo.update_drink", fields(id = id))]
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Drink, ApiError> {
        let encoded = recipe.map(encode_recipe).transpose()?;

        let row: Option<DrinkRow> = sqlx::query_as(
            r#"
            UPDATE drinks
            SET title = COALESCE(?, title), recipe = COALESCE(?, recipe)
            WHERE id = ?
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(encoded)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(map_constraint_violation)?;

        match row {
            Some(row) => decode_row(row),
            None => Err(ApiError::NotFound),
        }
    }

    /// Delete a drink by id.
    ///
    /// Returns `ApiError::NotFound` when no drink has the given id.
    #[instrument(skip_all, name = "menu.repo.delete_drink", fields(id = id))]
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }

        Ok(())
    }
}

/// Encode a recipe for storage.
fn encode_recipe(recipe: &[Ingredient]) -> Result<String, ApiError> {
    serde_json::to_string(recipe).map_err(|err| {
        tracing::error!(target: "menu.repo", error = %err, "Failed to encode recipe");
        ApiError::Internal
    })
}

/// Decode a stored row into a drink.
fn decode_row(row: DrinkRow) -> Result<Drink, ApiError> {
    let id = row.id;
    row.into_drink().map_err(|err| {
        tracing::error!(target: "menu.repo", id = id, error = %err, "Stored recipe did not decode");
        ApiError::Internal
    })
}

/// Turn a unique constraint violation into an unprocessable error.
fn map_constraint_violation(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            tracing::debug!(target: "menu.repo", "Duplicate drink title rejected");
            ApiError::Unprocessable
        }
        _ => ApiError::from(err),
    }
}

//! Data models for the menu service.
//!
//! Drinks are stored with their full recipe and served in two shapes: a
//! public summary that omits ingredient names, and the full
//! representation for clients holding the detail permission.

use serde::{Deserialize, Serialize};

/// Longest accepted drink title, in characters.
pub const MAX_TITLE_LENGTH: usize = 80;

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name, e.g. "lime juice".
    pub name: String,

    /// Display color for the graphic representation.
    pub color: String,

    /// Relative parts of this ingredient in the mix.
    pub parts: i64,
}

/// A drink with its full recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drink {
    /// Row id.
    pub id: i64,

    /// Unique drink title.
    pub title: String,

    /// Full recipe, ingredient names included.
    pub recipe: Vec<Ingredient>,
}

/// Recipe entry with the ingredient name withheld.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientSummary {
    /// Display color for the graphic representation.
    pub color: String,

    /// Relative parts of this ingredient in the mix.
    pub parts: i64,
}

/// Public representation of a drink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrinkSummary {
    /// Row id.
    pub id: i64,

    /// Unique drink title.
    pub title: String,

    /// Recipe with ingredient names withheld.
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    /// Convert to the public summary shape, dropping ingredient names.
    pub fn into_summary(self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title,
            recipe: self
                .recipe
                .into_iter()
                .map(|ingredient| IngredientSummary {
                    color: ingredient.color,
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

/// A drink as stored in the database, recipe still JSON-encoded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkRow {
    /// Row id.
    pub id: i64,

    /// Unique drink title.
    pub title: String,

    /// Recipe as a JSON array of ingredient objects.
    pub recipe: String,
}

impl DrinkRow {
    /// Decode the stored recipe into a full [`Drink`].
    pub fn into_drink(self) -> Result<Drink, serde_json::Error> {
        let recipe: Vec<Ingredient> = serde_json::from_str(&self.recipe)?;
        Ok(Drink {
            id: self.id,
            title: self.title,
            recipe,
        })
    }
}

/// Request body for creating a drink.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrinkRequest {
    /// Title for the new drink.
    pub title: String,

    /// Recipe for the new drink.
    pub recipe: Vec<Ingredient>,
}

impl CreateDrinkRequest {
    /// Validate the request, returning a reason string on failure.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_recipe(&self.recipe)
    }
}

/// Request body for updating a drink. Both fields are optional; absent
/// fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDrinkRequest {
    /// Replacement title, if any.
    #[serde(default)]
    pub title: Option<String>,

    /// Replacement recipe, if any.
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

impl UpdateDrinkRequest {
    /// Validate the request, returning a reason string on failure.
    ///
    /// At least one field must be present.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_none() && self.recipe.is_none() {
            return Err("no fields to update".to_string());
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &self.recipe {
            validate_recipe(recipe)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be blank".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), String> {
    if recipe.is_empty() {
        return Err("recipe must contain at least one ingredient".to_string());
    }
    for ingredient in recipe {
        if ingredient.name.trim().is_empty() {
            return Err("ingredient name must not be blank".to_string());
        }
        if ingredient.color.trim().is_empty() {
            return Err("ingredient color must not be blank".to_string());
        }
        if ingredient.parts < 1 {
            return Err("ingredient parts must be at least 1".to_string());
        }
    }
    Ok(())
}

/// Response body for the public menu listing.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    /// Always `true` for success responses.
    pub success: bool,

    /// Drinks in summary form.
    pub drinks: Vec<DrinkSummary>,
}

/// Response body carrying full drink representations.
#[derive(Debug, Serialize)]
pub struct DrinksResponse {
    /// Always `true` for success responses.
    pub success: bool,

    /// Drinks with complete recipes.
    pub drinks: Vec<Drink>,
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Always `true` for success responses.
    pub success: bool,

    /// Id of the deleted drink.
    pub delete: i64,
}

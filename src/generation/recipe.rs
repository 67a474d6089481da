//! Recipe generation seam.

use async_trait::async_trait;
use serde_json::json;

use crate::error::ClientError;
use crate::types::{GenerateRecipeInput, RecipeOutput, MAX_INGREDIENTS, MAX_INGREDIENT_LEN};

/// Anything that can turn ingredients into a recipe.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate_recipe(&self, input: &GenerateRecipeInput) -> Result<RecipeOutput, ClientError>;
}

/// Check a recipe request before any work is done.
pub fn validate_recipe_input(input: &GenerateRecipeInput) -> Result<(), ClientError> {
    if input.user_id.trim().is_empty() {
        return Err(ClientError::validation("user_id is required"));
    }

    let count = input.ingredients.len();
    if count == 0 || count > MAX_INGREDIENTS {
        return Err(ClientError::validation_with_details(
            format!("Between 1 and {MAX_INGREDIENTS} ingredients are required, got {count}"),
            json!({ "field": "ingredients", "count": count }),
        ));
    }

    for (index, ingredient) in input.ingredients.iter().enumerate() {
        let len = ingredient.trim().chars().count();
        if len == 0 || len > MAX_INGREDIENT_LEN {
            return Err(ClientError::validation_with_details(
                format!("Ingredient {} must be 1 to {MAX_INGREDIENT_LEN} characters", index + 1),
                json!({ "field": "ingredients", "index": index, "length": len }),
            ));
        }
    }

    if let Some(params) = &input.params {
        params.validate()?;
    }
    Ok(())
}

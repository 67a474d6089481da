//! The `recipe` structured response schema.

use serde_json::{json, Value};

use crate::types::StructuredResponseFormat;

/// Name the schema is registered under; also used for parse error context.
pub const RECIPE_SCHEMA_NAME: &str = "recipe";

/// JSON Schema for [`crate::types::RecipeOutput`].
pub fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Short, descriptive recipe name"
            },
            "summary": {
                "type": "string",
                "description": "One or two sentences describing the dish"
            },
            "ingredients": {
                "type": "string",
                "description": "Ingredient list with quantities, one per line"
            },
            "preparation": {
                "type": "string",
                "description": "Numbered step-by-step instructions"
            },
            "nutrition": {
                "type": "object",
                "description": "Estimated nutrition per serving",
                "properties": {
                    "calories": {"type": "number", "description": "kcal"},
                    "protein": {"type": "number", "description": "grams"},
                    "carbohydrates": {"type": "number", "description": "grams"},
                    "fat": {"type": "number", "description": "grams"}
                },
                "required": ["calories", "protein", "carbohydrates", "fat"],
                "additionalProperties": false
            }
        },
        "required": ["title", "summary", "ingredients", "preparation", "nutrition"],
        "additionalProperties": false
    })
}

/// Strict structured-output format requesting a recipe.
pub fn recipe_response_format() -> StructuredResponseFormat {
    StructuredResponseFormat::json_schema(RECIPE_SCHEMA_NAME, recipe_schema())
}

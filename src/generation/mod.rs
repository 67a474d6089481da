//! Recipe generation: the generator seam, structured parsing, the recipe
//! schema, and an offline mock.

pub mod mock;
pub mod object;
pub mod recipe;
pub mod schema;

pub use mock::MockRecipeGenerator;
pub use object::{parse_structured, parse_structured_value};
pub use recipe::{validate_recipe_input, RecipeGenerator};
pub use schema::{recipe_response_format, recipe_schema, RECIPE_SCHEMA_NAME};

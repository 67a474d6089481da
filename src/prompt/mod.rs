//! Recipe prompt construction.
//!
//! Pure and deterministic: the same ingredients and preferences always yield
//! the same two messages.

use crate::types::{ChatMessage, UserPreferences};

/// Language every generated recipe must be written in.
pub const OUTPUT_LANGUAGE: &str = "English";

/// The system and user messages for one recipe generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePrompt {
    pub system: ChatMessage,
    pub user: ChatMessage,
}

impl RecipePrompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![self.system, self.user]
    }
}

/// Build the prompt for `ingredients`, applying `preferences` when given.
pub fn build_recipe_prompt(
    ingredients: &[String],
    preferences: Option<&UserPreferences>,
) -> RecipePrompt {
    RecipePrompt {
        system: ChatMessage::system(system_prompt(preferences)),
        user: ChatMessage::user(user_prompt(ingredients)),
    }
}

/// Role, language and schema requirements, plus one directive per
/// non-empty preference field.
pub fn system_prompt(preferences: Option<&UserPreferences>) -> String {
    let mut lines = vec![
        "You are an experienced chef and nutritionist who writes practical home-cooking recipes."
            .to_string(),
        format!("Always write the recipe in {OUTPUT_LANGUAGE}."),
        "Respond only with a JSON object that matches the provided \"recipe\" schema exactly, \
         with no extra fields and no text outside the JSON."
            .to_string(),
    ];

    if let Some(prefs) = preferences {
        if let Some(diet) = &prefs.diet_type {
            lines.push(format!(
                "The user's diet is {diet}. Every ingredient and step must comply with it."
            ));
        }
        if let Some(allergens) = prefs.allergens() {
            lines.push(format!(
                "The user must avoid: {allergens}. Never include these ingredients or anything made from them."
            ));
        }
        if let Some(cuisines) = prefs.cuisines() {
            lines.push(format!(
                "Favor these cuisines when they suit the ingredients: {cuisines}."
            ));
        }
        if let Some(preferred) = prefs.preferred_ingredients() {
            lines.push(format!(
                "Where it makes sense, favor these ingredients: {preferred}."
            ));
        }
        if let Some(notes) = prefs.notes() {
            lines.push(format!("Additional notes from the user: {notes}"));
        }
    }

    lines.join("\n")
}

/// Ingredient list and the required recipe elements.
pub fn user_prompt(ingredients: &[String]) -> String {
    let mut prompt = String::from("Create a recipe using these ingredients:\n");
    for ingredient in ingredients {
        prompt.push_str("- ");
        prompt.push_str(ingredient);
        prompt.push('\n');
    }
    prompt.push_str(
        "\nThe recipe must include:\n\
         1. A title\n\
         2. A short summary\n\
         3. An ingredient list with quantities\n\
         4. Step-by-step preparation instructions\n\
         5. An estimated nutrition breakdown per serving (calories, protein, carbohydrates, fat)",
    );
    prompt
}

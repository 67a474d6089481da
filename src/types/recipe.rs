//! Recipe generation inputs and outputs.

use std::fmt;

use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use strum::EnumString;

use super::generation::ModelParams;

/// Maximum number of ingredients accepted for one generation.
pub const MAX_INGREDIENTS: usize = 20;
/// Maximum length of a single ingredient, in characters.
pub const MAX_INGREDIENT_LEN: usize = 100;

/// Diet a user follows. Labels parse case-insensitively; unknown labels are
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum DietType {
    #[strum(serialize = "omnivore")]
    Omnivore,
    #[strum(serialize = "vegetarian")]
    Vegetarian,
    #[strum(serialize = "vegan")]
    Vegan,
    #[strum(serialize = "pescatarian")]
    Pescatarian,
    #[strum(serialize = "keto", serialize = "ketogenic")]
    Keto,
    #[strum(serialize = "gluten-free", serialize = "gluten_free", serialize = "gluten free")]
    GlutenFree,
    #[strum(
        serialize = "dairy-free",
        serialize = "dairy_free",
        serialize = "dairy free",
        serialize = "lactose-free",
        serialize = "lactose_free"
    )]
    DairyFree,
    #[strum(default)]
    Other(String),
}

impl DietType {
    /// Human-readable label used in prompts.
    pub fn label(&self) -> &str {
        match self {
            Self::Omnivore => "omnivore",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
            Self::Keto => "keto",
            Self::GlutenFree => "gluten-free",
            Self::DairyFree => "dairy-free",
            Self::Other(label) => label,
        }
    }

    /// Parse a free-text diet label. Blank text and "none" mean no diet.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return None;
        }
        Some(Self::from(trimmed.to_string()))
    }
}

impl From<String> for DietType {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        trimmed
            .parse()
            .unwrap_or_else(|_| Self::Other(trimmed.to_string()))
    }
}

impl From<DietType> for String {
    fn from(value: DietType) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dietary preferences supplied by the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
pub struct UserPreferences {
    /// `None` when the user has not chosen a diet.
    #[serde(
        default,
        deserialize_with = "deserialize_diet",
        skip_serializing_if = "Option::is_none"
    )]
    pub diet_type: Option<DietType>,
    #[builder(into)]
    pub allergens: Option<String>,
    #[builder(into)]
    pub cuisines: Option<String>,
    #[builder(into)]
    pub preferred_ingredients: Option<String>,
    #[builder(into)]
    pub notes: Option<String>,
}

fn deserialize_diet<'de, D>(deserializer: D) -> Result<Option<DietType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(DietType::parse_label))
}

impl UserPreferences {
    pub fn allergens(&self) -> Option<&str> {
        non_blank(&self.allergens)
    }

    pub fn cuisines(&self) -> Option<&str> {
        non_blank(&self.cuisines)
    }

    pub fn preferred_ingredients(&self) -> Option<&str> {
        non_blank(&self.preferred_ingredients)
    }

    pub fn notes(&self) -> Option<&str> {
        non_blank(&self.notes)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Input to `generate_recipe`.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct GenerateRecipeInput {
    #[builder(into)]
    pub user_id: String,
    pub ingredients: Vec<String>,
    pub preferences: Option<UserPreferences>,
    #[builder(into)]
    pub model: Option<String>,
    pub params: Option<ModelParams>,
}

/// Nutrition estimate per serving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

/// A generated recipe, exactly matching the `recipe` response schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeOutput {
    pub title: String,
    pub summary: String,
    pub ingredients: String,
    pub preparation: String,
    pub nutrition: Nutrition,
}
